//! # strata-tool
//!
//! Read-only inspection binary for STRATA ledger stores. Opens the store in
//! lookup-only mode (it can never commit), answers point queries, and can
//! re-verify the entire stored chain with the same engines the store itself
//! commits with.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use strata_ledger::storage::kv::SledBackend;
use strata_ledger::storage::BlockStore;
use strata_ledger::{Block, ChainValidator, MerkleProofEngine, ProofValidator, SealEngine};

mod cli;
mod logging;

use cli::{BlockArgs, Commands, StrataToolCli};
use logging::{init_logging, LogFormat};

fn main() -> Result<()> {
    let cli = StrataToolCli::parse();
    init_logging("info", LogFormat::from_str_lossy(&cli.log_format));

    let backend = SledBackend::open(&cli.store)
        .with_context(|| format!("opening store at {}", cli.store.display()))?;
    let store = BlockStore::lookup_only(backend);

    match cli.command {
        Commands::Head => show_head(&store),
        Commands::Block(args) => show_block(&store, &args),
        Commands::Tx(args) => show_transaction(&store, &args.id),
        Commands::BlockOf(args) => show_block_of(&store, &args.id),
        Commands::Verify => verify_chain(&store),
    }
}

/// One-line block summary for terminal output.
fn summarize(block: &Block) -> String {
    format!(
        "height={} seal={} prev_seal={} txs={} timestamp={}",
        block.height,
        block.seal_hex(),
        hex::encode(&block.prev_seal),
        block.tx_count(),
        block
            .timestamp
            .map(|t| t.to_string())
            .unwrap_or_else(|| "unset".to_string()),
    )
}

fn show_head(store: &BlockStore<SledBackend>) -> Result<()> {
    match store.get_last_block()? {
        Some(head) => println!("{}", summarize(&head)),
        None => bail!("store is empty: no chain head"),
    }
    Ok(())
}

fn show_block(store: &BlockStore<SledBackend>, args: &BlockArgs) -> Result<()> {
    let block = if let Some(height) = args.height {
        store.get_block_by_height(height)?
    } else if let Some(ref seal_hex) = args.seal {
        let seal = hex::decode(seal_hex).context("seal must be hex")?;
        store.get_block_by_seal(&seal)?
    } else {
        unreachable!("clap enforces exactly one selector");
    };

    match block {
        Some(block) => {
            println!("{}", summarize(&block));
            for tx in &block.transactions {
                println!("  tx {}", tx.id);
            }
        }
        None => bail!("no such block"),
    }
    Ok(())
}

fn show_transaction(store: &BlockStore<SledBackend>, id: &str) -> Result<()> {
    match store.get_transaction_by_id(id)? {
        Some(tx) => println!("{}", serde_json::to_string_pretty(&tx)?),
        None => bail!("no such transaction: {id}"),
    }
    Ok(())
}

fn show_block_of(store: &BlockStore<SledBackend>, id: &str) -> Result<()> {
    match store.get_block_by_tx_id(id)? {
        Some(block) => println!("{}", summarize(&block)),
        None => bail!("no block contains transaction: {id}"),
    }
    Ok(())
}

/// Walk the stored chain from genesis to head, re-running the same checks
/// the store applies at commit time: seal integrity, proof integrity, and
/// predecessor linkage.
fn verify_chain(store: &BlockStore<SledBackend>) -> Result<()> {
    let Some(head) = store.get_last_block()? else {
        bail!("store is empty: nothing to verify");
    };

    let chain = ChainValidator::new();
    let seals = SealEngine::new();
    let proofs = MerkleProofEngine::new();

    let mut previous: Option<Block> = None;
    let mut failures = 0usize;

    for height in 0..=head.height {
        let Some(block) = store.get_block_by_height(height)? else {
            warn!(height, "missing block in height index");
            failures += 1;
            previous = None;
            continue;
        };

        if !chain.is_extension(&block, previous.as_ref()) {
            warn!(height, "chain linkage broken at this height");
            failures += 1;
        }
        if !seals.validate_seal(&block.seal, &block)? {
            warn!(height, "seal does not match header fields");
            failures += 1;
        }
        if !proofs.validate_tx_proof(&block.tx_proof, &block.transactions)? {
            warn!(height, "tx proof does not match transaction batch");
            failures += 1;
        }

        previous = Some(block);
    }

    if failures > 0 {
        bail!("chain verification failed: {failures} problem(s) found");
    }

    info!(head_height = head.height, "chain verified");
    println!(
        "ok: {} block(s) verified up to seal {}",
        head.height + 1,
        head.seal_hex()
    );
    Ok(())
}
