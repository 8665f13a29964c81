use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use seaport_account::create_account;
use seaport_chain::implementations::alloy::AlloyChainState;
use seaport_config::{ConfigLoader, SeaportConfig};
use seaport_core::Seaport;
use seaport_delivery::implementations::evm::alloy::create_http_delivery;
use seaport_delivery::TransactionMethods;
use seaport_fulfillment::Exclusions;
use seaport_order::order_hash;
use seaport_types::{
	truncate_hash, CreateInputItem, CreateOrderInput, CriteriaResolution, Order, OrderComponents,
	OrderWithNonce,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod files;

#[derive(Parser, Debug)]
#[command(name = "seaport")]
#[command(about = "Create, fill and cancel Seaport orders", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[arg(short, long, value_name = "FILE", default_value = "config/seaport.toml")]
	config: PathBuf,

	#[arg(long, env = "SEAPORT_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Approve what is missing, sign an order, and write it out
	Create {
		/// Order input (JSON)
		#[arg(short, long)]
		input: PathBuf,
		/// Where to write the signed order (JSON)
		#[arg(short, long)]
		output: PathBuf,
	},
	/// Fill signed orders against each other through the match entry point
	Fulfill {
		/// Signed order files, in batch order
		#[arg(long = "order", required = true, num_args = 1..)]
		orders: Vec<PathBuf>,
		/// Criteria resolutions (JSON array)
		#[arg(long)]
		criteria: Option<PathBuf>,
		/// Add a counter-order from this account taking the other side of a single order
		#[arg(long)]
		mirror: bool,
		/// Tips paid by this account on a mirrored fill (JSON array of items)
		#[arg(long, requires = "mirror")]
		tips: Option<PathBuf>,
	},
	/// Cancel orders signed by this account
	Cancel {
		#[arg(long = "order", required = true, num_args = 1..)]
		orders: Vec<PathBuf>,
	},
	/// Increment this account's nonce, cancelling every order signed under it
	BulkCancel,
	/// Record order signatures on chain
	ValidateOrders {
		#[arg(long = "order", required = true, num_args = 1..)]
		orders: Vec<PathBuf>,
	},
	/// Show the on-chain status of an order
	Status {
		#[arg(long)]
		order_hash: alloy::primitives::B256,
	},
	/// Print the hash of an order
	Hash {
		#[arg(long)]
		order: PathBuf,
	},
	/// Validate the configuration file
	Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	match &cli.command {
		Commands::Validate => validate_config(&cli.config),
		Commands::Hash { order } => print_hash(order),
		command => {
			let config = load_config(&cli.config)?;
			let seaport = build_seaport(config)?;
			run(&seaport, command).await
		}
	}
}

async fn run(seaport: &Seaport, command: &Commands) -> Result<()> {
	let confirmations = seaport.config().network.confirmations;
	match command {
		Commands::Create { input, output } => {
			let input: CreateOrderInput = files::read_json(input)?;
			let use_case = seaport
				.create_order(&input)
				.await
				.context("Failed to plan order creation")?;
			info!(approvals = use_case.approvals().len(), "Creating order");

			let order = use_case
				.execute_all_actions()
				.await
				.context("Failed to create order")?;
			files::write_json(output, &order)?;
			info!(
				order_hash = %truncate_hash(&seaport.get_order_hash(&order.parameters).to_string()),
				"Wrote signed order to {:?}",
				output
			);
		}
		Commands::Fulfill {
			orders,
			criteria,
			mirror,
			tips,
		} => {
			let orders: Vec<OrderWithNonce> = files::read_all(orders)?;
			let resolutions: Vec<CriteriaResolution> = match criteria {
				Some(path) => files::read_json(path)?,
				None => Vec::new(),
			};
			let tips: Vec<CreateInputItem> = match tips {
				Some(path) => files::read_json(path)?,
				None => Vec::new(),
			};

			let planned = if *mirror {
				let [order] = orders.as_slice() else {
					bail!("--mirror takes exactly one order, got {}", orders.len());
				};
				seaport.fulfill_order(order, &resolutions, &tips).await
			} else {
				seaport
					.fulfill_orders(&orders, &resolutions, &Exclusions::new())
					.await
			};
			let use_case = planned.context("Failed to plan fulfillment")?;
			info!(
				approvals = use_case.approvals().len(),
				value = %use_case.terminal().plan().value,
				"Fulfilling orders"
			);

			let hash = use_case
				.execute_all_actions()
				.await
				.context("Failed to fulfill orders")?;
			println!("{}", hash);
		}
		Commands::Cancel { orders } => {
			let orders: Vec<OrderWithNonce> = files::read_all(orders)?;
			let components: Vec<OrderComponents> =
				orders.into_iter().map(|order| order.parameters).collect();
			submit(seaport.cancel_orders(&components), confirmations).await?;
		}
		Commands::BulkCancel => {
			submit(seaport.bulk_cancel_orders(), confirmations).await?;
		}
		Commands::ValidateOrders { orders } => {
			let orders: Vec<OrderWithNonce> = files::read_all(orders)?;
			let orders: Vec<Order> = orders.into_iter().map(Order::from).collect();
			submit(seaport.validate(&orders), confirmations).await?;
		}
		Commands::Status { order_hash } => {
			let status = seaport
				.get_order_status(*order_hash)
				.await
				.context("Failed to read order status")?;
			println!("{}", serde_json::to_string_pretty(&status)?);
		}
		Commands::Hash { .. } | Commands::Validate => {}
	}
	Ok(())
}

async fn submit(transaction: TransactionMethods, confirmations: u64) -> Result<()> {
	let receipt = transaction
		.transact_and_confirm(confirmations)
		.await
		.context("Transaction failed")?;
	info!(
		tx_hash = %receipt.hash.truncated(),
		block = receipt.block_number,
		"Transaction confirmed"
	);
	println!("{}", receipt.hash);
	Ok(())
}

fn load_config(path: &Path) -> Result<SeaportConfig> {
	info!("Loading configuration from: {:?}", path);
	ConfigLoader::from_file(path).context("Failed to load configuration")
}

fn build_seaport(config: SeaportConfig) -> Result<Seaport> {
	let account = create_account(&config.account.provider, &config.account.config)
		.context("Failed to create account")?;
	let delivery = create_http_delivery(
		&config.network.rpc_url,
		config.network.chain_id,
		&config.account.config,
	)
	.context("Failed to create transaction delivery")?;
	let chain = AlloyChainState::new(&config.network.rpc_url, config.seaport.contract_address)
		.context("Failed to create chain reader")?;

	Seaport::new(
		config,
		Arc::from(account),
		Arc::new(delivery),
		Arc::new(chain),
	)
	.context("Failed to build Seaport client")
}

fn validate_config(path: &Path) -> Result<()> {
	let config = load_config(path)?;

	info!("Configuration is valid");
	info!("Settlement contract: {}", config.seaport.contract_address);
	info!("Chain id: {}", config.network.chain_id);
	info!("Account provider: {}", config.account.provider);
	for (key, address) in &config.seaport.conduits {
		info!("  Conduit {}: {}", truncate_hash(&key.to_string()), address);
	}
	Ok(())
}

fn print_hash(path: &Path) -> Result<()> {
	let order: OrderWithNonce = files::read_json(path)?;
	println!("{}", order_hash(&order.parameters));
	Ok(())
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_cli_is_well_formed() {
		use clap::CommandFactory;
		Cli::command().debug_assert();
	}

	#[test]
	fn test_parses_fulfill_with_several_orders() {
		let cli = Cli::try_parse_from([
			"seaport",
			"--config",
			"custom.toml",
			"fulfill",
			"--order",
			"a.json",
			"b.json",
			"--criteria",
			"c.json",
		])
		.unwrap();

		assert_eq!(cli.config, PathBuf::from("custom.toml"));
		match cli.command {
			Commands::Fulfill {
				orders,
				criteria,
				mirror,
				tips,
			} => {
				assert_eq!(orders, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
				assert_eq!(criteria, Some(PathBuf::from("c.json")));
				assert!(!mirror);
				assert_eq!(tips, None);
			}
			other => panic!("unexpected command {:?}", other),
		}
	}

	#[test]
	fn test_tips_need_a_mirrored_fill() {
		let base = ["seaport", "fulfill", "--order", "a.json", "--tips", "t.json"];
		assert!(Cli::try_parse_from(base).is_err());

		let cli = Cli::try_parse_from(base.iter().copied().chain(["--mirror"])).unwrap();
		assert!(matches!(
			cli.command,
			Commands::Fulfill { mirror: true, tips: Some(path), .. } if path == PathBuf::from("t.json")
		));
	}

	#[test]
	fn test_cancel_requires_an_order() {
		assert!(Cli::try_parse_from(["seaport", "cancel"]).is_err());
	}

	#[test]
	fn test_parses_status_hash() {
		let cli = Cli::try_parse_from([
			"seaport",
			"status",
			"--order-hash",
			"0x0101010101010101010101010101010101010101010101010101010101010101",
		])
		.unwrap();
		assert!(matches!(
			cli.command,
			Commands::Status { order_hash } if order_hash == alloy::primitives::B256::repeat_byte(1)
		));
	}
}
