//! Subcommands and their execution against an engine.

use clap::Subcommand;
use cohort_engine::{Candidate, Engine, NewProposal};
use cohort_store_mem::MemStore;
use cohort_types::{Address, LogicalTime, ProposalId};
use serde_json::json;

/// Who is calling, and when.
pub struct Invocation {
    pub caller: Address,
    pub now: LogicalTime,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the configuration and print it.
    CheckConfig,
    /// Open a new proposal.
    Create {
        /// Discussion post the proposal comes from.
        #[arg(long = "ref")]
        external_ref: String,
        /// Proposer address (defaults to the caller).
        #[arg(long)]
        proposer: Option<String>,
        /// Proposer display name (defaults to the proposer address).
        #[arg(long)]
        proposer_name: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Whitelist a participant.
    Add {
        #[arg(long)]
        proposal: u64,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "")]
        display_name: String,
        /// Verifier verdict for this participant.
        #[arg(long)]
        verified: bool,
        /// Discussion reply the participant joined from.
        #[arg(long)]
        source: Option<String>,
    },
    /// Fix participant shares.
    Finalize {
        #[arg(long)]
        proposal: u64,
    },
    /// Record deployment of the token and treasury.
    Deploy {
        #[arg(long)]
        proposal: u64,
        #[arg(long)]
        token: String,
        #[arg(long)]
        treasury: String,
    },
    /// Record a payout.
    Claim {
        #[arg(long)]
        proposal: u64,
        #[arg(long)]
        address: String,
    },
    /// Print a proposal and its roster.
    Show {
        #[arg(long)]
        proposal: u64,
    },
    /// Print the allocation plan for a proposal.
    Plan {
        #[arg(long)]
        proposal: u64,
    },
    /// List proposals awaiting deployment.
    Ready,
    /// Print registry statistics.
    Stats,
}

impl Command {
    /// Whether a successful run changes the ledger.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Create { .. }
                | Self::Add { .. }
                | Self::Finalize { .. }
                | Self::Deploy { .. }
                | Self::Claim { .. }
        )
    }

    /// Run against `engine` and return the text to print.
    pub fn execute(self, engine: &Engine<MemStore>, inv: &Invocation) -> anyhow::Result<String> {
        let output = match self {
            Self::CheckConfig => engine.config().to_toml_string()?,
            Self::Create {
                external_ref,
                proposer,
                proposer_name,
                name,
                symbol,
                description,
            } => {
                let proposer = proposer.map(Address::new).unwrap_or_else(|| inv.caller.clone());
                let proposer_name = proposer_name.unwrap_or_else(|| proposer.to_string());
                let id = engine.create_proposal(
                    NewProposal {
                        external_ref,
                        proposer,
                        proposer_name,
                        name,
                        symbol,
                        description,
                    },
                    inv.now,
                )?;
                json!({ "proposal": id.get() }).to_string()
            }
            Self::Add {
                proposal,
                address,
                display_name,
                verified,
                source,
            } => {
                let mut candidate = Candidate::new(address, display_name);
                if let Some(source) = source {
                    candidate = candidate.with_source(source);
                }
                let count = engine.add_participant(
                    ProposalId::new(proposal),
                    candidate,
                    verified,
                    &inv.caller,
                    inv.now,
                )?;
                json!({ "participant_count": count }).to_string()
            }
            Self::Finalize { proposal } => {
                let shares =
                    engine.finalize_allocations(ProposalId::new(proposal), &inv.caller, inv.now)?;
                let shares: serde_json::Map<String, serde_json::Value> = shares
                    .into_iter()
                    .map(|(address, bp)| (address.to_string(), json!(bp.get())))
                    .collect();
                serde_json::to_string_pretty(&shares)?
            }
            Self::Deploy {
                proposal,
                token,
                treasury,
            } => {
                engine.mark_deployed(ProposalId::new(proposal), token, treasury, &inv.caller, inv.now)?;
                json!({ "deployed": proposal }).to_string()
            }
            Self::Claim { proposal, address } => {
                engine.mark_claimed(ProposalId::new(proposal), &Address::new(address), &inv.caller)?;
                json!({ "claimed": true }).to_string()
            }
            Self::Show { proposal } => {
                let id = ProposalId::new(proposal);
                let record = engine.get_proposal(id)?;
                let roster = engine.participants(id)?;
                serde_json::to_string_pretty(&json!({
                    "proposal": record,
                    "participants": roster,
                }))?
            }
            Self::Plan { proposal } => engine.allocation_plan(ProposalId::new(proposal))?.to_json()?,
            Self::Ready => {
                let ready: Vec<u64> = engine
                    .ready_proposals()?
                    .into_iter()
                    .map(|p| p.id.get())
                    .collect();
                json!(ready).to_string()
            }
            Self::Stats => serde_json::to_string_pretty(&engine.stats()?)?,
        };
        Ok(output)
    }
}
