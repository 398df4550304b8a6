//! Toss Payments v1 confirmation client.
//!
//! The storefront initiates a charge in the browser; the gateway then
//! redirects back with a payment key that must be confirmed server-side
//! within the payment session window. This module owns that single HTTP
//! call: a POST of `{paymentKey, orderId, amount}` authorized with a
//! Basic header derived from the secret key.

use crate::{
    config::payment::PaymentConfig,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

/// Toss Payments v1 API base URL.
pub const API_BASE_URL: &str = "https://api.tosspayments.com/v1";

/// Path of the payment confirmation endpoint, relative to the API base.
pub const CONFIRM_PATH: &str = "/payments/confirm";

/// Gateway request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of the confirmation call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    /// Payment key handed back by the gateway redirect
    pub payment_key: String,
    /// Merchant-side order identifier
    pub order_id: String,
    /// Charge amount in whole won
    pub amount: i64,
}

/// Payment lifecycle states reported by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Payment window opened, nothing authorized yet
    Ready,
    /// Authentication in progress
    InProgress,
    /// Virtual account issued, waiting for the deposit
    WaitingForDeposit,
    /// Charge completed
    Done,
    /// Charge cancelled
    Canceled,
    /// Charge partially cancelled
    PartialCanceled,
    /// Charge aborted by the gateway
    Aborted,
    /// Payment session expired
    Expired,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ready => "READY",
            Self::InProgress => "IN_PROGRESS",
            Self::WaitingForDeposit => "WAITING_FOR_DEPOSIT",
            Self::Done => "DONE",
            Self::Canceled => "CANCELED",
            Self::PartialCanceled => "PARTIAL_CANCELED",
            Self::Aborted => "ABORTED",
            Self::Expired => "EXPIRED",
        };
        f.write_str(s)
    }
}

/// Receipt link attached to a completed payment.
#[derive(Clone, Debug, Deserialize)]
pub struct Receipt {
    /// Customer-facing receipt URL
    pub url: String,
}

/// Subset of the gateway's payment object used by this storefront.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// Payment key of the confirmed charge
    pub payment_key: String,
    /// Merchant-side order identifier echoed back
    pub order_id: String,
    /// Display name of the purchase
    #[serde(default)]
    pub order_name: Option<String>,
    /// Final payment status
    pub status: PaymentStatus,
    /// Charged amount in whole won
    pub total_amount: i64,
    /// Payment method label (card, transfer, ...)
    #[serde(default)]
    pub method: Option<String>,
    /// When the payment was requested
    #[serde(default)]
    pub requested_at: Option<String>,
    /// When the payment was approved
    #[serde(default)]
    pub approved_at: Option<String>,
    /// Receipt link, when issued
    #[serde(default)]
    pub receipt: Option<Receipt>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    code: String,
    message: String,
}

/// Maps the gateway's machine-readable error codes to storefront messages.
/// Unknown codes fall back to the message the gateway sent.
#[must_use]
pub fn describe_error_code(code: &str) -> Option<&'static str> {
    let message = match code {
        "UNAUTHORIZED_KEY" => "the payment API key was rejected",
        "FORBIDDEN_REQUEST" => "the API key and order do not match",
        "NOT_FOUND_PAYMENT" => "the payment could not be found",
        "NOT_FOUND_PAYMENT_SESSION" => "the payment session expired, please start over",
        "ALREADY_PROCESSED_PAYMENT" => "this payment has already been processed",
        "PROVIDER_ERROR" => "the payment provider reported an error",
        "EXCEED_MAX_CARD_INSTALLMENT_PLAN" => "the installment plan exceeds the card limit",
        "INVALID_REJECT_CARD" => "the card was declined",
        "BELOW_MINIMUM_AMOUNT" => "the amount is below the card minimum",
        "INVALID_CARD_EXPIRATION" => "the card expiration date is invalid",
        "INVALID_STOPPED_CARD" => "the card has been stopped",
        "NOT_CANCELABLE_PAYMENT" => "the payment cannot be cancelled",
        "FAILED_INTERNAL_SYSTEM_PROCESSING" => "the gateway failed internally, please retry",
        _ => return None,
    };
    Some(message)
}

/// Builds the Basic authorization header value from the secret key.
///
/// The gateway expects `base64(secret_key + ":")`, i.e. Basic auth with an
/// empty password.
#[must_use]
pub fn encode_secret_key(secret_key: &str) -> String {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    format!("Basic {}", STANDARD.encode(format!("{secret_key}:")))
}

/// Seam between the payment flow and the gateway transport.
///
/// `core::payment` depends on this trait so tests can substitute a stub for
/// the real HTTP client.
pub trait ConfirmPayment {
    /// Confirms a charge, returning the gateway's payment object.
    async fn confirm(&self, request: &ConfirmRequest) -> Result<PaymentResponse>;
}

/// HTTP client for the confirmation endpoint.
#[derive(Clone, Debug)]
pub struct PaymentClient {
    http: reqwest::Client,
    secret_key: String,
    confirm_url: String,
}

impl PaymentClient {
    /// Creates a client from the payment configuration.
    pub fn new(config: &PaymentConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            secret_key: config.secret_key.clone(),
            confirm_url: format!(
                "{}{CONFIRM_PATH}",
                config.api_base_url.trim_end_matches('/')
            ),
        })
    }
}

impl ConfirmPayment for PaymentClient {
    async fn confirm(&self, request: &ConfirmRequest) -> Result<PaymentResponse> {
        debug!(
            order_id = %request.order_id,
            amount = request.amount,
            "confirming payment"
        );

        let response = self
            .http
            .post(&self.confirm_url)
            .header(
                reqwest::header::AUTHORIZATION,
                encode_secret_key(&self.secret_key),
            )
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response.json::<PaymentResponse>().await.map_err(Into::into);
        }

        // Failure bodies carry {code, message}; keep the code and map it to
        // a local message when we know it.
        match response.json::<GatewayErrorBody>().await {
            Ok(body) => {
                error!(code = %body.code, "payment confirmation rejected");
                let message = describe_error_code(&body.code)
                    .map_or(body.message, str::to_string);
                Err(Error::Gateway {
                    code: body.code,
                    message,
                })
            }
            Err(_) => Err(Error::Gateway {
                code: status.as_u16().to_string(),
                message: "payment confirmation failed".to_string(),
            }),
        }
    }
}
