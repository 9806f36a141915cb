//! KelpDAO: `deposit(referralId)` on Arbitrum
//!
//! KelpDAO also has a Base pool at 0x291088312150482826b3A37d5A69a4c54DAa9118,
//! but only the Arbitrum deployment is wired into calls.

use super::Protocol;
use crate::amount::{MinOutPolicy, NormalizedDeposit};
use crate::config::Network;
use crate::wallet::CallArgs;
use alloy::primitives::address;
use serde_json::{json, Value};

const REFERRAL_ID: &str = "0xd05723c7b17b4e4c722ca4fb95e64ffc54a70131c75e2b2548a456c51ed7cdaf";

const DESCRIPTION: &str = "
This tool allows depositing Ether into Kelpdao.
It takes:
- amount: The amount of Ether to deposit

Important notes:
- Make sure to use the exact amount provided. Do not convert units for Ether for this action.
- This is supported on the following networks:
  - Base Mainnet (ie, 'base', 'base-mainnet')
  - Ethereum Mainnet (ie, 'ethereum', 'ethereum-mainnet')
  - Polygon Mainnet (ie, 'polygon', 'polygon-mainnet')
  - Arbitrum Mainnet (ie, 'arbitrum', 'arbitrum-mainnet')
";

pub static KELPDAO: Protocol = Protocol {
    action_name: "kelpdao_deposit",
    display_name: "Kelpdao",
    description: DESCRIPTION,
    network: Network::Arbitrum,
    contract: address!("376A7564AF88242D6B8598A5cfdD2E9759711B61"),
    method: "deposit",
    abi,
    min_out: MinOutPolicy::Omitted,
    deadline_window: None,
    build_args,
};

fn abi() -> Value {
    json!([
        {
            "inputs": [
                { "internalType": "string", "name": "referralId", "type": "string" }
            ],
            "name": "deposit",
            "outputs": [],
            "stateMutability": "payable",
            "type": "function"
        }
    ])
}

fn build_args(_deposit: &NormalizedDeposit) -> CallArgs {
    let mut args = CallArgs::new();
    args.insert("referralId".to_string(), REFERRAL_ID.to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::normalize;
    use chrono::Utc;

    #[test]
    fn test_build_args_only_referral() {
        let deposit = normalize("1", KELPDAO.min_out, KELPDAO.deadline_window, Utc::now()).unwrap();
        let args = build_args(&deposit);

        assert_eq!(args.len(), 1);
        assert_eq!(args["referralId"], REFERRAL_ID);
    }

    #[test]
    fn test_call_attaches_decimal_amount() {
        let deposit = normalize("0.25", KELPDAO.min_out, KELPDAO.deadline_window, Utc::now()).unwrap();
        let call = KELPDAO.contract_call(&deposit);

        assert_eq!(call.amount.to_string(), "0.25");
        assert_eq!(call.asset_id, "eth");
        assert_eq!(call.network, Network::Arbitrum);
    }
}
