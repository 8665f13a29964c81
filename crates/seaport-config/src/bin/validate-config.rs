//! Configuration validation utility
//!
//! Usage: cargo run --bin validate-config config/seaport.toml

use std::env;
use std::process;

use seaport_config::ConfigLoader;

fn main() {
	let args: Vec<String> = env::args().collect();

	if args.len() != 2 {
		eprintln!("Usage: {} <config-file>", args[0]);
		process::exit(1);
	}

	let config_path = &args[1];

	println!("Validating configuration file: {}", config_path);

	match ConfigLoader::from_file(config_path) {
		Ok(config) => {
			println!("Configuration is valid");
			println!("Settlement contract: {}", config.seaport.contract_address);
			println!("Chain id: {}", config.network.chain_id);
			println!("RPC url: {}", config.network.rpc_url);
			println!("Confirmations: {}", config.network.confirmations);
			println!(
				"Fulfillment buffer: {}s",
				config.seaport.ascending_amount_fulfillment_buffer_secs
			);
			println!("Conduits configured: {}", config.seaport.conduits.len());
			println!("Account provider: {}", config.account.provider);
		}
		Err(e) => {
			eprintln!("Configuration validation failed:");
			eprintln!("{}", e);
			process::exit(1);
		}
	}
}
