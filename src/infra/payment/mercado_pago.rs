use crate::domain::models::payment::{CheckoutCreated, CheckoutRequest, GatewayPayment};
use crate::domain::ports::PaymentGateway;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{error, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Mercado Pago checkout integration. Creates a checkout preference when a
/// payment is initiated and resolves payment status when the webhook fires.
pub struct MercadoPagoGateway {
    client: Client,
    api_url: String,
    access_token: String,
}

impl MercadoPagoGateway {
    pub fn new(api_url: String, access_token: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, api_url, access_token }
    }
}

#[derive(Deserialize)]
struct PreferenceResponse {
    id: String,
    init_point: Option<String>,
    sandbox_init_point: Option<String>,
}

#[derive(Deserialize)]
struct PaymentResponse {
    status: String,
    external_reference: Option<String>,
}

#[async_trait]
impl PaymentGateway for MercadoPagoGateway {
    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutCreated, AppError> {
        let body = json!({
            "items": [{
                "id": format!("booking-{}", request.external_reference),
                "title": request.title,
                "description": request.description,
                "quantity": 1,
                "currency_id": "BRL",
                "unit_price": request.amount,
            }],
            "payer": { "email": request.payer_email },
            "external_reference": request.external_reference,
            "back_urls": {
                "success": request.success_url,
                "failure": request.failure_url,
                "pending": request.pending_url,
            },
            "auto_return": "approved",
            "notification_url": request.notification_url,
        });

        let res = self.client
            .post(format!("{}/checkout/preferences", self.api_url))
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Payment processor connection error: {}", e);
                AppError::Upstream("Payment processor unreachable".to_string())
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!("Payment processor rejected preference. Status: {}, Body: {}", status, text);
            return Err(AppError::Upstream("Failed to create payment preference".to_string()));
        }

        let data: PreferenceResponse = res.json().await.map_err(|e| {
            error!("Malformed preference response: {}", e);
            AppError::Upstream("Malformed payment processor response".to_string())
        })?;

        let init_point = data.sandbox_init_point
            .or(data.init_point)
            .ok_or_else(|| AppError::Upstream("Preference has no checkout URL".to_string()))?;

        Ok(CheckoutCreated {
            preference_id: data.id,
            init_point,
        })
    }

    async fn get_payment(&self, payment_id: &str) -> Result<Option<GatewayPayment>, AppError> {
        let res = self.client
            .get(format!("{}/v1/payments/{}", self.api_url, payment_id))
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .map_err(|e| {
                error!("Payment processor connection error: {}", e);
                AppError::Upstream("Payment processor unreachable".to_string())
            })?;

        // The processor answered but does not recognize (or refuses) the id.
        // A business no-op for the caller, not a retryable failure.
        if !res.status().is_success() {
            warn!("Payment lookup for {} returned status {}", payment_id, res.status());
            return Ok(None);
        }

        let data: PaymentResponse = res.json().await.map_err(|e| {
            error!("Malformed payment response: {}", e);
            AppError::Upstream("Malformed payment processor response".to_string())
        })?;

        Ok(Some(GatewayPayment {
            status: data.status,
            external_reference: data.external_reference,
        }))
    }
}
