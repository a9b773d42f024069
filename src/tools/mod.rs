pub mod diagnostics;
pub mod formatter;
pub mod printer;
