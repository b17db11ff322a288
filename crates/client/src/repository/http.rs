use std::time::Duration;

use api_types::{
    ErrorResponse,
    booking::{BookingListResponse, BookingNew, BookingStatusUpdate, BookingView},
};
use engine::{Booking, BookingStatus, NewBooking, Role};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::{BookingRepository, RepositoryError};

/// [`BookingRepository`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpRepository {
    base_url: Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl HttpRepository {
    /// Fails if `base_url` is not an absolute URL.
    ///
    /// A trailing `/` is added when missing, so `http://host/api` and
    /// `http://host/api/` resolve endpoints the same way.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, RepositoryError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)
            .map_err(|err| RepositoryError::Server(format!("invalid base_url: {err}")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            token,
            http: builder.build()?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RepositoryError> {
        self.base_url
            .join(path)
            .map_err(|err| RepositoryError::Server(format!("invalid endpoint {path}: {err}")))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RepositoryError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let res = request.send().await?;
        if res.status().is_success() {
            return Ok(res);
        }
        Err(error_from_response(res).await)
    }
}

async fn error_from_response(res: Response) -> RepositoryError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());
    tracing::debug!("booking api answered {status}: {body}");

    match status {
        StatusCode::UNAUTHORIZED => RepositoryError::Unauthorized,
        StatusCode::FORBIDDEN => RepositoryError::Forbidden,
        StatusCode::NOT_FOUND => RepositoryError::NotFound,
        StatusCode::CONFLICT => RepositoryError::Conflict(body),
        StatusCode::UNPROCESSABLE_ENTITY => RepositoryError::Validation(body),
        _ => RepositoryError::Server(body),
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, RepositoryError> {
    res.json::<T>()
        .await
        .map_err(|err| RepositoryError::Decode(err.to_string()))
}

fn into_booking(view: BookingView) -> Result<Booking, RepositoryError> {
    Booking::try_from(view).map_err(|err| RepositoryError::Decode(err.to_string()))
}

impl BookingRepository for HttpRepository {
    async fn list_bookings(
        &self,
        role: Role,
        actor_id: &str,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let endpoint = self.endpoint(&format!("{role}/bookings"))?;
        tracing::debug!("GET {endpoint} for {role} {actor_id}");

        let res = self.send(self.http.get(endpoint)).await?;
        decode::<BookingListResponse>(res)
            .await?
            .into_bookings()
            .into_iter()
            .map(into_booking)
            .collect()
    }

    async fn create_booking(
        &self,
        client_id: &str,
        payload: &NewBooking,
    ) -> Result<Booking, RepositoryError> {
        let endpoint = self.endpoint("bookings")?;
        tracing::debug!("POST {endpoint} for client {client_id}");

        let body = BookingNew::from(payload);
        let res = self.send(self.http.post(endpoint).json(&body)).await?;
        into_booking(decode::<BookingView>(res).await?)
    }

    async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Booking, RepositoryError> {
        let endpoint = self.endpoint(&format!("bookings/{booking_id}/status"))?;
        tracing::debug!("PATCH {endpoint} -> {status}");

        let body = BookingStatusUpdate { status };
        let res = self.send(self.http.patch(endpoint).json(&body)).await?;
        into_booking(decode::<BookingView>(res).await?)
    }

    async fn delete_booking(&self, booking_id: &str) -> Result<(), RepositoryError> {
        let endpoint = self.endpoint(&format!("bookings/{booking_id}"))?;
        tracing::debug!("DELETE {endpoint}");

        self.send(self.http.delete(endpoint)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let repo = HttpRepository::new("http://127.0.0.1:8000/api", None, None).unwrap();
        assert_eq!(
            repo.endpoint("chef/bookings").unwrap().as_str(),
            "http://127.0.0.1:8000/api/chef/bookings"
        );
    }

    #[test]
    fn relative_base_url_is_rejected() {
        assert!(matches!(
            HttpRepository::new("localhost/api", None, None),
            Err(RepositoryError::Server(_))
        ));
    }
}
