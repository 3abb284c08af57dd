pub mod console_sender;
pub mod smtp_sender;

pub use console_sender::ConsoleEmailSender;
pub use smtp_sender::SmtpEmailSender;
