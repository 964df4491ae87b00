//! Network actor - runs bill service calls in Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::BillClient;

/// Network actor that processes bill service commands
pub struct NetworkActor {
    client: BillClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: BillClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::FetchBills { id, query }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            // No cancellation: superseded responses are dropped by the app layer
                            self.active_requests.spawn(async move {
                                tracing::info!(id, page = query.page, month = %query.month, "Executing bill fetch");
                                let response = match client.fetch_bills(&query).await {
                                    Ok(page) => {
                                        tracing::info!(id, items = page.items.len(), "Bill fetch completed");
                                        NetworkResponse::BillsLoaded { id, page }
                                    }
                                    Err(error) => NetworkResponse::BillsFailed { id, error },
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::FetchCategories) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                let response = match client.fetch_categories().await {
                                    Ok(categories) => NetworkResponse::CategoriesLoaded(categories),
                                    Err(error) => NetworkResponse::CategoriesFailed(error),
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::AddBill(bill)) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(amount = %bill.amount, kind = bill.kind.as_str(), "Adding bill");
                                let response = match client.add_bill(&bill).await {
                                    Ok(()) => NetworkResponse::BillAdded,
                                    Err(error) => NetworkResponse::AddBillFailed(error),
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {
                    // Task completed - responses are sent by the tasks themselves
                }
            }
        }
    }
}
