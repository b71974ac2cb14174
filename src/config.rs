// ABOUTME: Version info, REPL banner text, and process exit codes

pub const VERSION: &str = "0.1.0";
pub const WELCOME_MESSAGE: &str = "Lox Interpreter v0.1.0";
pub const WELCOME_SUBTITLE: &str = "A tree-walking interpreter for the Lox language";

pub const HISTORY_FILE: &str = ".lox_history";

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USAGE_ERROR: i32 = 64;
pub const EXIT_STATIC_ERROR: i32 = 65;
pub const EXIT_RUNTIME_ERROR: i32 = 70;
