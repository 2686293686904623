pub mod eval;
pub mod expr;
pub mod program;
pub mod statement;
pub mod value;

pub use eval::{Comparison, Evaluator};
pub use expr::{BinaryOp, Expr, ExprError};
pub use program::{DuplicateLinePolicy, Program, ProgramLine};
pub use statement::Statement;
pub use value::{Value, Variables, MEASUREMENT_VARIABLE};
