/// Outbound service clients
///
/// Each submodule wraps one external dependency behind a small typed
/// client owned by the application state:
///
/// - `email`: SMTP delivery of notification and confirmation mail
/// - `google`: Google OAuth code exchange and profile fetch
/// - `razorpay`: Payment order creation and webhook signature checks

pub mod email;
pub mod google;
pub mod razorpay;
