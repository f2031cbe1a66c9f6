use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

use crate::service::dispatcher::Dispatcher;

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
}

/// Runs the HTTP surface: a single `POST /chat` route that hands the raw
/// message to the dispatcher and returns its text.
pub async fn run_api(dispatcher: Arc<Dispatcher>, port: u16) {
    let dispatcher = warp::any().map(move || dispatcher.clone());

    let chat = warp::path("chat")
        .and(warp::post())
        .and(warp::body::json())
        .and(dispatcher)
        .and_then(handle_chat);

    println!("Listening on port {}", port);
    warp::serve(chat).run(([0, 0, 0, 0], port)).await;
}

async fn handle_chat(
    request: ChatRequest,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, Infallible> {
    let response = match dispatcher.handle(&request.message).await {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Fallback responder error: {}", e);
            format!("{}", e)
        }
    };
    Ok(warp::reply::json(&ChatResponse { response }))
}
