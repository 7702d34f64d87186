//! A local stand-in for worldtimeapi.org and timeapi.io.

use std::{collections::HashMap, sync::OnceLock, time::Duration};

use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use serde_json::json;
use tokio::runtime::Builder;

#[get("/api/ip")]
async fn ip_self() -> impl Responder {
    web::Json(json!({
        "abbreviation": "UTC",
        "client_ip": "127.0.0.1",
        "datetime": "2023-10-27T10:00:00.000000+00:00",
        "timezone": "UTC",
        "unixtime": 1698400800,
    }))
}

#[get("/api/ip/{ip}")]
async fn ip_lookup(path: web::Path<String>) -> impl Responder {
    match path.as_str() {
        "8.8.8.8" => HttpResponse::Ok().json(json!({
            "abbreviation": "EDT",
            "client_ip": "8.8.8.8",
            "datetime": "2023-10-27T06:00:00.000000-04:00",
            "timezone": "America/New_York",
            "utc_offset": "-04:00",
        })),
        _ => HttpResponse::NotFound().json(json!({ "error": "unknown location" })),
    }
}

#[get("/api/Time/current/ip")]
async fn timeapi_io(query: web::Query<HashMap<String, String>>) -> impl Responder {
    match query.get("ipAddress").map(String::as_str) {
        Some("1.2.3.4") => HttpResponse::Ok().json(json!({
            "dateTime": "2023-10-27T12:00:00.5",
            "timeZone": "Europe/Paris",
            "dstActive": true,
        })),
        _ => HttpResponse::BadRequest().body("Invalid IpAddress"),
    }
}

#[get("/broken")]
async fn broken() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html")
        .body("<html>upstream unavailable</html>")
}

#[get("/slow")]
async fn slow() -> impl Responder {
    actix_web::rt::time::sleep(Duration::from_secs(3)).await;
    HttpResponse::Ok().json(json!({ "datetime": "2023-10-27T10:00:00Z", "timezone": "UTC" }))
}

/// Starts the fake time API once per test binary and returns its base URL.
pub fn fake_time_api() -> &'static str {
    static BASE_URL: OnceLock<String> = OnceLock::new();
    BASE_URL.get_or_init(|| {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let server = HttpServer::new(|| {
                    App::new()
                        .service(ip_self)
                        .service(ip_lookup)
                        .service(timeapi_io)
                        .service(broken)
                        .service(slow)
                })
                .workers(2)
                .bind(("127.0.0.1", 0))
                .unwrap();
                tx.send(format!("http://{}", server.addrs()[0])).unwrap();
                server.run().await.unwrap();
            });
        });
        rx.recv().unwrap()
    })
}
