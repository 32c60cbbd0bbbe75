use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub database_url: String,
    pub seed_demo_data: bool,
    pub brevo: BrevoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrevoConfig {
    pub api_key: String,
    pub sms_url: String,
    pub whatsapp_url: String,
    pub sms_sender: String,
    pub whatsapp_business_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            bind_address: format!(
                "0.0.0.0:{}",
                env::var("PORT").unwrap_or_else(|_| "8080".to_string())
            ),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "file://student_management.db".to_string()),
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),

            brevo: BrevoConfig {
                api_key: env::var("BREVO_API_KEY")?,
                sms_url: env::var("BREVO_SMS_URL")
                    .unwrap_or_else(|_| "https://api.brevo.com/v3/transactionalSMS/sms".to_string()),
                whatsapp_url: env::var("BREVO_WHATSAPP_URL")
                    .unwrap_or_else(|_| "https://api.brevo.com/v3/whatsapp/sendMessage".to_string()),
                sms_sender: env::var("BREVO_SMS_SENDER")
                    .unwrap_or_else(|_| "SchoolAI".to_string()),
                whatsapp_business_id: env::var("WHATSAPP_BUSINESS_ID")?,
            },
        })
    }
}
