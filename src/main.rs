use std::collections::BTreeSet;
use std::env;

use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use credit_ledger::csv::{read_requests, write_summaries};
use credit_ledger::store::EventFilter;
use credit_ledger::{EventStore, Ledger, MemoryStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .expect("usage: credit-ledger <awards.csv>");

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let mut ledger = Ledger::new(MemoryStore::new());
    let (req_sender, req_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in read_requests(&path) {
            match result {
                Ok(req) => {
                    req_sender.send(req).await.unwrap();
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    ledger.run(ReceiverStream::new(req_receiver)).await;

    let events = ledger
        .store()
        .scan(&EventFilter::default())
        .expect("event store scan failed");
    let users: BTreeSet<&str> = events.iter().map(|e| e.user.as_str()).collect();

    let summaries: Vec<_> = users
        .into_iter()
        .map(|user| ledger.user_summary(user).expect("event store read failed"))
        .collect();
    write_summaries(summaries);
}
