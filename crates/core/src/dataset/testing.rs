//! Shared fixtures for dataset tests: sample collections and a minimal
//! single-purpose HTTP responder that serves canned JSON documents.

use std::collections::HashMap;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

use crate::models::{Cost, Unit, Warband};

pub(crate) const UNITS_BODY: &str = r#"[
  {"id": "u1", "name": "Swordsman", "type": "Infantry",
   "cost": {"gold": 30}, "profile": {"M": 4, "WS": 3},
   "keywords": ["Human"], "warband_ids": ["w1"]},
  {"id": "u2", "name": "Archer", "type": "Infantry",
   "warband_ids": ["w404"]}
]"#;

pub(crate) const WARBANDS_BODY: &str = r#"[
  {"id": "w1", "name": "Mercenaries", "game": "Mordheim",
   "source": {"name": "Core Rulebook", "page": 12},
   "unit_ids": ["u1"]}
]"#;

pub(crate) const META_BODY: &str = r#"{"counts": {"units": 2, "warbands": 1}}"#;

pub(crate) fn sample_units() -> Vec<Unit> {
    vec![
        Unit {
            id: "u1".to_string(),
            name: "Swordsman".to_string(),
            unit_type: Some("Infantry".to_string()),
            cost: Some(Cost {
                gold: Some(30),
                upkeep: None,
            }),
            profile: None,
            keywords: vec!["Human".to_string()],
            tags: Vec::new(),
            equipment: None,
            warband_ids: vec!["w1".to_string()],
        },
        Unit {
            id: "u2".to_string(),
            name: "Archer".to_string(),
            unit_type: Some("Infantry".to_string()),
            cost: None,
            profile: None,
            keywords: Vec::new(),
            tags: Vec::new(),
            equipment: None,
            warband_ids: vec!["w404".to_string()],
        },
    ]
}

pub(crate) fn sample_warbands() -> Vec<Warband> {
    vec![Warband {
        id: "w1".to_string(),
        name: "Mercenaries".to_string(),
        game: Some("Mordheim".to_string()),
        summary: None,
        tags: Vec::new(),
        source: None,
        unit_ids: vec!["u1".to_string()],
    }]
}

/// Serve the given `path → (status, body)` routes on an ephemeral local
/// port, returning the base URL. Unknown paths answer 404.
pub(crate) async fn serve(routes: HashMap<&'static str, (u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match stream.read(&mut buf).await {
                        Ok(0) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buf[..n]);
                            if request.windows(4).any(|window| window == b"\r\n\r\n") {
                                break;
                            }
                        }
                        Err(_) => return,
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let path = head
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .trim_start_matches('/')
                    .to_string();
                let (status, body) = routes
                    .get(path.as_str())
                    .cloned()
                    .unwrap_or((404, String::new()));

                let response = format!(
                    "HTTP/1.1 {status} OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

/// Routes serving all three documents successfully.
pub(crate) fn default_routes() -> HashMap<&'static str, (u16, String)> {
    HashMap::from([
        ("units.json", (200, UNITS_BODY.to_string())),
        ("warbands.json", (200, WARBANDS_BODY.to_string())),
        ("index.json", (200, META_BODY.to_string())),
    ])
}
