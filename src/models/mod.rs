pub mod notification;
pub mod trip;
