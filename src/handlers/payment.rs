//! Local listener for the payment gateway's browser redirects.
//!
//! After checkout the gateway sends the browser to the finish, unfinish or
//! error URL with `order_id`, `status_code` and `transaction_status` in the
//! query. These handlers turn that into a [`PaymentOutcome`] and hand it to
//! whoever is waiting on the [`CallbackListener`].

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, web};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::services::payment::{
    GatewayRedirect, Navigation, PaymentOutcome, RedirectKind, SUCCESS_ROUTE,
};

/// One gateway redirect, decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackResult {
    pub kind: RedirectKind,
    pub redirect: GatewayRedirect,
    pub outcome: PaymentOutcome,
}

/// Shared handler state
#[derive(Debug, Clone)]
pub struct CallbackState {
    sender: mpsc::UnboundedSender<CallbackResult>,
}

impl CallbackState {
    pub fn new(sender: mpsc::UnboundedSender<CallbackResult>) -> Self {
        Self { sender }
    }
}

fn respond(state: &CallbackState, kind: RedirectKind, redirect: GatewayRedirect) -> HttpResponse {
    let outcome = redirect.outcome(kind);
    info!(
        order_id = ?redirect.order_id,
        status_code = ?redirect.status_code,
        transaction_status = ?redirect.transaction_status,
        outcome = ?outcome,
        "Payment gateway redirect received"
    );

    let message = match outcome.navigation() {
        Navigation::Navigate(SUCCESS_ROUTE) => "Terima kasih! Donasi Anda berhasil.".to_string(),
        Navigation::Navigate(_) => "Donasi Anda sedang menunggu pembayaran.".to_string(),
        Navigation::Message(message) => message,
    };

    if state
        .sender
        .send(CallbackResult {
            kind,
            redirect,
            outcome: outcome.clone(),
        })
        .is_err()
    {
        warn!("Payment redirect arrived after the listener stopped waiting");
    }

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<!DOCTYPE html><html lang=\"id\"><head><meta charset=\"UTF-8\"><title>AmalSAS.id</title></head>\
             <body><h1>{message}</h1><p>Anda dapat menutup halaman ini.</p></body></html>"
        ))
}

pub async fn finish(
    query: web::Query<GatewayRedirect>,
    state: web::Data<CallbackState>,
) -> HttpResponse {
    respond(&state, RedirectKind::Finish, query.into_inner())
}

pub async fn unfinish(
    query: web::Query<GatewayRedirect>,
    state: web::Data<CallbackState>,
) -> HttpResponse {
    respond(&state, RedirectKind::Unfinish, query.into_inner())
}

pub async fn error(
    query: web::Query<GatewayRedirect>,
    state: web::Data<CallbackState>,
) -> HttpResponse {
    respond(&state, RedirectKind::Error, query.into_inner())
}

/// Register the redirect routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/payment/finish", web::get().to(finish))
        .route("/payment/unfinish", web::get().to(unfinish))
        .route("/payment/error", web::get().to(error));
}

/// A running redirect listener
pub struct CallbackListener {
    addr: SocketAddr,
    handle: ServerHandle,
    receiver: mpsc::UnboundedReceiver<CallbackResult>,
}

impl CallbackListener {
    /// Bind and start serving. Must be called inside a tokio runtime.
    pub fn start(bind: &str) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let state = web::Data::new(CallbackState::new(sender));

        let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
            .workers(1)
            .disable_signals()
            .bind(bind)?;
        let addr = server
            .addrs()
            .first()
            .copied()
            .ok_or_else(|| std::io::Error::other(format!("no address bound for {bind}")))?;

        let server = server.run();
        let handle = server.handle();
        tokio::spawn(server);
        info!(%addr, "Payment callback listener started");

        Ok(Self {
            addr,
            handle,
            receiver,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn finish_url(&self) -> String {
        format!("http://{}/payment/finish", self.addr)
    }

    /// Wait for the first redirect, then shut the listener down
    pub async fn wait(mut self, timeout: Duration) -> Result<CallbackResult, ClientError> {
        let received = tokio::time::timeout(timeout, self.receiver.recv()).await;
        self.handle.stop(true).await;

        match received {
            Ok(Some(result)) => Ok(result),
            Ok(None) => Err(ClientError::Callback("listener closed".to_string())),
            Err(_) => Err(ClientError::Callback(format!(
                "no gateway redirect within {}s",
                timeout.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, test};

    #[actix_web::test]
    async fn test_finish_redirect_is_forwarded() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(CallbackState::new(sender)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/payment/finish?order_id=ORDER-1&status_code=200&transaction_status=settlement")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body = to_bytes(resp.into_body()).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("berhasil"));

        let result = receiver.recv().await.unwrap();
        assert_eq!(result.kind, RedirectKind::Finish);
        assert_eq!(result.outcome, PaymentOutcome::Success);
        assert_eq!(result.redirect.order_id.as_deref(), Some("ORDER-1"));
    }

    #[actix_web::test]
    async fn test_unfinish_without_status_is_cancelled() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(CallbackState::new(sender)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/payment/unfinish?order_id=ORDER-2")
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body = to_bytes(resp.into_body()).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Transaksi dibatalkan."));
        assert_eq!(receiver.recv().await.unwrap().outcome, PaymentOutcome::Cancelled);
    }
}
