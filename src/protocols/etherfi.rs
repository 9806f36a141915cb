//! EtherFi: `deposit(tokenIn, amountIn, minAmountOut)` on Base

use super::{insert_opt, Protocol};
use crate::amount::{MinOutPolicy, NormalizedDeposit};
use crate::config::Network;
use crate::wallet::CallArgs;
use alloy::primitives::address;
use serde_json::{json, Value};

/// Sentinel `tokenIn` for native ETH
const NATIVE_TOKEN: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

const DESCRIPTION: &str = "
This tool allows depositing Ether into EtherFi.
It takes:

- amount: The amount of Ether to deposit

Important notes:
- Make sure to use the exact amount provided. Do not convert units for Ether for this action.
";

pub static ETHERFI: Protocol = Protocol {
    action_name: "etherfi_deposit",
    display_name: "EtherFi",
    description: DESCRIPTION,
    network: Network::Base,
    contract: address!("c38e046dFDAdf15f7F56853674242888301208a5"),
    method: "deposit",
    abi,
    min_out: MinOutPolicy::Slippage {
        tolerance_bps: 1_000,
    },
    deadline_window: None,
    build_args,
};

fn abi() -> Value {
    json!([
        {
            "inputs": [
                { "internalType": "address", "name": "tokenIn", "type": "address" },
                { "internalType": "uint256", "name": "amountIn", "type": "uint256" },
                { "internalType": "uint256", "name": "minAmountOut", "type": "uint256" }
            ],
            "name": "deposit",
            "outputs": [
                { "internalType": "uint256", "name": "amountOut", "type": "uint256" }
            ],
            "stateMutability": "payable",
            "type": "function"
        }
    ])
}

fn build_args(deposit: &NormalizedDeposit) -> CallArgs {
    let mut args = CallArgs::new();
    args.insert("tokenIn".to_string(), NATIVE_TOKEN.to_string());
    args.insert("amountIn".to_string(), deposit.atomic.to_string());
    insert_opt(&mut args, "minAmountOut", deposit.min_out);
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::normalize;
    use chrono::Utc;

    #[test]
    fn test_build_args() {
        let deposit = normalize("0.01", ETHERFI.min_out, ETHERFI.deadline_window, Utc::now()).unwrap();
        let args = build_args(&deposit);

        assert_eq!(args["tokenIn"], NATIVE_TOKEN);
        assert_eq!(args["amountIn"], "10000000000000000");
        assert_eq!(args["minAmountOut"], "9000000000000000");
        assert!(deposit.deadline.is_none());
    }
}
