//! Renzo: `depositETH(_minOut, _deadline)` on Base

use super::{insert_opt, Protocol};
use crate::amount::{MinOutPolicy, NormalizedDeposit};
use crate::config::Network;
use crate::wallet::CallArgs;
use alloy::primitives::address;
use serde_json::{json, Value};
use std::time::Duration;

const DESCRIPTION: &str = "
This tool allows depositing Ether into Renzo.
It takes:

- amount: The amount of Ether to deposit

Important notes:
- Make sure to use the exact amount provided. Do not convert units for Ether for this action.
";

pub static RENZO: Protocol = Protocol {
    action_name: "renzo_deposit",
    display_name: "Renzo",
    description: DESCRIPTION,
    network: Network::Base,
    contract: address!("f25484650484DE3d554fB0b7125e7696efA4ab99"),
    method: "depositETH",
    abi,
    // Placeholder until a real ezETH quote is wired in: no slippage headroom.
    min_out: MinOutPolicy::Exact,
    deadline_window: Some(Duration::from_secs(20 * 60)),
    build_args,
};

fn abi() -> Value {
    json!([
        {
            "inputs": [
                { "internalType": "uint256", "name": "_minOut", "type": "uint256" },
                { "internalType": "uint256", "name": "_deadline", "type": "uint256" }
            ],
            "name": "depositETH",
            "outputs": [
                { "internalType": "uint256", "name": "", "type": "uint256" }
            ],
            "stateMutability": "payable",
            "type": "function"
        }
    ])
}

fn build_args(deposit: &NormalizedDeposit) -> CallArgs {
    let mut args = CallArgs::new();
    insert_opt(&mut args, "_minOut", deposit.min_out);
    insert_opt(&mut args, "_deadline", deposit.deadline);
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::normalize;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_build_args() {
        let now = Utc.with_ymd_and_hms(2024, 11, 20, 12, 0, 0).unwrap();
        let deposit = normalize("0.01", RENZO.min_out, RENZO.deadline_window, now).unwrap();
        let args = build_args(&deposit);

        assert_eq!(args["_minOut"], "10000000000000000");
        assert_eq!(args["_deadline"], (now.timestamp() + 1200).to_string());
        assert_eq!(args.len(), 2);
    }
}
