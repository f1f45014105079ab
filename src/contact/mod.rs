//! 問い合わせフォーム：入力検証、送信状態、通知、送信先

mod controller;
mod delivery;
mod field;
mod message;
mod notification;
mod state;
mod timer;
mod validation;

pub use controller::{
    ContactFormController,
    FormTimings,
};
pub use delivery::{
    DeliveryEndpoint,
    DeliveryError,
    HttpDeliveryEndpoint,
};
pub use field::{
    Field,
    UnknownField,
};
pub use message::ContactMessage;
pub use notification::{
    Notification,
    NotificationKind,
};
pub use state::{
    FieldValues,
    FormState,
    SubmissionStatus,
};
pub use timer::TimerHandle;
pub use validation::{
    FieldError,
    MESSAGE_MAX_LENGTH,
    MESSAGE_MIN_LENGTH,
    text_length,
    validate,
};
