use std::io::IsTerminal;
use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tcpwire_endpoint::Response;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ResponseOutput<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    err: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    peer: Option<String>,
    timestamp: String,
}

pub fn print_response(response: &Response, peer: Option<SocketAddr>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ResponseOutput {
                status: status(response),
                value: response.value.as_ref(),
                err: response.err.as_deref(),
                peer: peer.map(|addr| addr.to_string()),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["STATUS", "PEER", "RESULT"])
                .add_row(vec![
                    status(response).to_string(),
                    peer.map(|addr| addr.to_string()).unwrap_or_default(),
                    result_text(response),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("({}) {}", status(response), result_text(response));
        }
    }
}

fn status(response: &Response) -> &'static str {
    if response.is_ok() {
        "ok"
    } else {
        "error"
    }
}

fn result_text(response: &Response) -> String {
    if let Some(err) = &response.err {
        return err.clone();
    }
    match &response.value {
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(value) => value.to_string(),
        None => "(nil)".to_string(),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
