use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{MediaError, Result};

/// Start a local HTTP server that streams media files under `root` with
/// Range support, so the viewport can seek inside large sources. Returns
/// the port number; requests are handled on a background thread for the
/// life of the process.
pub fn start_media_server(root: impl Into<PathBuf>) -> Result<u16> {
    let root = root.into();
    let server = tiny_http::Server::http("127.0.0.1:0")
        .map_err(|e| MediaError::Server(e.to_string()))?;
    let port = match server.server_addr().to_ip() {
        Some(addr) => addr.port(),
        None => return Err(MediaError::Server("no TCP address".into())),
    };
    tracing::info!("Media server started on port {}", port);

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            handle_request(&root, request);
        }
    });

    Ok(port)
}

fn handle_request(root: &Path, request: tiny_http::Request) {
    let raw_path = request.url().to_string();
    let relative = percent_decode(raw_path.strip_prefix('/').unwrap_or(&raw_path));

    let path = match resolve_under_root(root, &relative) {
        Some(p) => p,
        None => {
            tracing::warn!("rejected path outside media root: {relative}");
            let resp = tiny_http::Response::from_string("Forbidden").with_status_code(403);
            let _ = request.respond(resp);
            return;
        }
    };

    let file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            let resp = tiny_http::Response::from_string(format!("Not found: {}", e))
                .with_status_code(404);
            let _ = request.respond(resp);
            return;
        }
    };

    let total_size = file.metadata().map(|m| m.len()).unwrap_or(0);
    let mime: tiny_http::Header = {
        let ext = relative.rsplit('.').next().unwrap_or("").to_lowercase();
        let ct = mime_for(&ext);
        tiny_http::Header::from_bytes("Content-Type", ct).unwrap()
    };

    let accept_ranges = tiny_http::Header::from_bytes("Accept-Ranges", "bytes").unwrap();
    let cors = tiny_http::Header::from_bytes("Access-Control-Allow-Origin", "*").unwrap();

    let range_header = request
        .headers()
        .iter()
        .find(|h| h.field.as_str() == "Range" || h.field.as_str() == "range")
        .map(|h| h.value.as_str().to_string());

    if let Some(range) = range_header {
        let (start, end) = parse_range(&range, total_size);
        let length = end - start + 1;
        let mut file = file;
        let _ = file.seek(SeekFrom::Start(start));
        let reader = file.take(length);

        let content_range = tiny_http::Header::from_bytes(
            "Content-Range",
            format!("bytes {}-{}/{}", start, end, total_size),
        )
        .unwrap();

        let resp = tiny_http::Response::new(
            tiny_http::StatusCode(206),
            vec![mime, accept_ranges, cors, content_range],
            reader,
            Some(length as usize),
            None,
        );
        let _ = request.respond(resp);
    } else {
        let resp = tiny_http::Response::new(
            tiny_http::StatusCode(200),
            vec![mime, accept_ranges, cors],
            file,
            Some(total_size as usize),
            None,
        );
        let _ = request.respond(resp);
    }
}

fn mime_for(ext: &str) -> &'static str {
    match ext {
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Parse a `bytes=start-end` header value; open ends fall back to the file
/// extent.
fn parse_range(range: &str, total_size: u64) -> (u64, u64) {
    let range_str = range.strip_prefix("bytes=").unwrap_or(range);
    let parts: Vec<&str> = range_str.split('-').collect();
    let start: u64 = parts[0].parse().unwrap_or(0);
    let end: u64 = if parts.len() > 1 && !parts[1].is_empty() {
        parts[1].parse().unwrap_or(total_size.saturating_sub(1))
    } else {
        total_size.saturating_sub(1)
    };
    (start, end.min(total_size.saturating_sub(1)))
}

/// Resolve a request path against the media root, refusing traversal
/// outside it.
fn resolve_under_root(root: &Path, relative: &str) -> Option<PathBuf> {
    let candidate = Path::new(relative);
    if candidate.is_absolute() {
        return None;
    }
    if candidate
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return None;
    }
    Some(root.join(candidate))
}

fn percent_decode(s: &str) -> String {
    let mut result = Vec::with_capacity(s.len());
    let mut bytes = s.bytes();
    while let Some(b) = bytes.next() {
        if b == b'%' {
            let h = bytes.next().unwrap_or(b'0');
            let l = bytes.next().unwrap_or(b'0');
            let hex_str = [h, l];
            if let Ok(decoded) =
                u8::from_str_radix(std::str::from_utf8(&hex_str).unwrap_or("00"), 16)
            {
                result.push(decoded);
            }
        } else {
            result.push(b);
        }
    }
    String::from_utf8_lossy(&result).into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
