// Streams view state changes as newline-delimited JSON chunks
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use serde::Serialize;
use tokio::sync::watch;

/// One JSON document per line: the current value first, then every change
/// until the sender is dropped.
pub fn state_lines<T>(mut rx: watch::Receiver<T>) -> impl Stream<Item = Result<Bytes, std::io::Error>>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    async_stream::stream! {
        loop {
            let value = rx.borrow_and_update().clone();
            yield serialize_line(&value);
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

fn serialize_line<T: Serialize>(value: &T) -> Result<Bytes, std::io::Error> {
    let mut line = BytesMut::new().writer();
    serde_json::to_writer(&mut line, value)?;
    let mut line = line.into_inner();
    line.put_u8(b'\n');
    Ok(line.freeze())
}

/// Chunked `application/x-ndjson` response over a byte stream
pub fn ndjson_response<S>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static,
{
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
