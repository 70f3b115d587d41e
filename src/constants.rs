// UI Constants
pub const APP_TITLE: &str = "Code Review Bot";
pub const INPUT_PLACEHOLDER: &str = "Enter a GitHub repository link...";
pub const LOADING_TEXT: &str = "Reviewing repository...";
pub const USER_ICON: &str = "🧑";
pub const BOT_ICON: &str = "🤖";
pub const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];
pub const SIDEBAR_WIDTH: u16 = 28;

// API Constants
pub const FEEDBACK_PATH: &str = "/feedback";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const ATTACHMENT_FILENAME: &str = "feedback.html";
pub const ATTACHMENT_LABEL: &str = "Download the feedback file";

// Environment overrides
pub const ENV_SERVER_URL: &str = "REVIEWBOT_SERVER_URL";
pub const ENV_RESPONSE_MODE: &str = "REVIEWBOT_RESPONSE_MODE";
