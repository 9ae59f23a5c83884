use axum::Router;
use tokio::net::TcpListener;

/// Serve `router` on a random local port for the rest of the test, returning
/// the base URL to reach it at.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{addr}")
}
