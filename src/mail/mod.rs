// Mail delivery: the sender trait and the SendGrid implementation.

pub mod sendgrid;
pub mod traits;
