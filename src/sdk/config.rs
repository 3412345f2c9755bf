use std::env;

use super::routing::backend::{GoogleAuth, GoogleMatrixBackend, OsrmBackend, OtpBackend, ValhallaBackend};
use super::routing::service::{RouteBackend, DEFAULT_ENTRYPOINT};
use super::util::rate_limit::QuotaLimiter;

/// Backend selection for the command-line frontend, resolved from the
/// environment. Google wants `GOOGLE_API_KEY` or a
/// `GOOGLE_CLIENT_ID`/`GOOGLE_CLIENT_SECRET` pair; the self-hosted engines
/// read `ROUTING_ENTRYPOINT`.
pub enum BackendConfig {
    Google(GoogleAuth),
    Otp { entrypoint: String },
    Osrm { entrypoint: String },
    Valhalla { entrypoint: String },
}

impl BackendConfig {
    pub fn from_env(service: &str) -> Result<Self, String> {
        let entrypoint =
            env::var("ROUTING_ENTRYPOINT").unwrap_or_else(|_| DEFAULT_ENTRYPOINT.to_string());

        match service {
            "google" => {
                if let Ok(api_key) = env::var("GOOGLE_API_KEY") {
                    Ok(Self::Google(GoogleAuth::ApiKey(api_key)))
                } else {
                    let client_id = env::var("GOOGLE_CLIENT_ID").map_err(|_| {
                        "set GOOGLE_API_KEY, or GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET"
                            .to_string()
                    })?;
                    let client_secret = env::var("GOOGLE_CLIENT_SECRET").map_err(|_| {
                        "GOOGLE_CLIENT_ID is set but GOOGLE_CLIENT_SECRET is not".to_string()
                    })?;
                    Ok(Self::Google(GoogleAuth::ClientCredentials {
                        client_id,
                        client_secret,
                    }))
                }
            }
            "otp" => Ok(Self::Otp { entrypoint }),
            "osrm" => Ok(Self::Osrm { entrypoint }),
            "valhalla" => Ok(Self::Valhalla { entrypoint }),
            other => Err(format!("unknown routing service \"{}\"", other)),
        }
    }

    pub fn build(self) -> Box<dyn RouteBackend> {
        match self {
            Self::Google(auth) => {
                Box::new(GoogleMatrixBackend::new(auth, QuotaLimiter::default()))
            }
            Self::Otp { entrypoint } => Box::new(OtpBackend::new(entrypoint)),
            Self::Osrm { entrypoint } => Box::new(OsrmBackend::new(entrypoint)),
            Self::Valhalla { entrypoint } => Box::new(ValhallaBackend::new(entrypoint)),
        }
    }
}
