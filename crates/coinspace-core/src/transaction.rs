//! Transaction history normalization
//!
//! Network backends report history in their own shapes. [`normalize`] maps
//! either shape onto [`CanonicalTransaction`] using only the record itself
//! and the session's network.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use coinspace_params::{ConfirmationPolicy, NetworkFamily, NetworkName};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Address and amount on one side of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEndpoint {
    /// Address
    pub address: String,
    /// Amount in the smallest unit
    pub amount: u128,
}

/// History record from a hierarchical (UTXO) backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHierarchicalTx {
    /// Transaction id
    pub txid: String,
    /// Block time in unix seconds, absent while unconfirmed
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Confirmation depth
    #[serde(default)]
    pub confirmations: u32,
    /// Fee paid
    #[serde(default)]
    pub fee: u64,
    /// Net balance change for the wallet, fee included
    pub amount: i64,
    /// Spent outputs
    #[serde(default)]
    pub inputs: Vec<TxEndpoint>,
    /// Created outputs
    #[serde(default)]
    pub outputs: Vec<TxEndpoint>,
}

/// History record from an account-model backend.
///
/// Values are in wei, so they routinely exceed 64 bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAccountTx {
    /// Transaction hash
    pub hash: String,
    /// Block time in unix seconds, absent while pending
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Confirmation depth
    #[serde(default)]
    pub confirmations: u32,
    /// Sender
    pub from: String,
    /// Recipient
    pub to: String,
    /// Transferred value
    pub value: u128,
    /// Fee paid by the sender
    #[serde(default)]
    pub fee: u128,
    /// Whether the wallet sent this transaction
    pub outgoing: bool,
}

/// Raw record as produced by a network backend.
///
/// Serialized without a tag. Decoding picks the family by key: `txid` marks a
/// hierarchical record, `hash` an account-model one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawTransaction {
    /// Hierarchical family record
    Hierarchical(RawHierarchicalTx),
    /// Account-model family record
    Account(RawAccountTx),
}

impl RawTransaction {
    /// Family the record belongs to
    pub fn family(&self) -> NetworkFamily {
        match self {
            RawTransaction::Hierarchical(_) => NetworkFamily::Hierarchical,
            RawTransaction::Account(_) => NetworkFamily::AccountModel,
        }
    }
}

// Decoded as one flat struct so every numeric field reaches its own
// deserializer; a buffered untagged enum would read 128-bit values as f64.
#[derive(Deserialize)]
struct RawRecord {
    txid: Option<String>,
    hash: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    confirmations: u32,
    #[serde(default)]
    fee: u128,
    amount: Option<i64>,
    #[serde(default)]
    inputs: Vec<TxEndpoint>,
    #[serde(default)]
    outputs: Vec<TxEndpoint>,
    from: Option<String>,
    to: Option<String>,
    value: Option<u128>,
    #[serde(default)]
    outgoing: bool,
}

impl TryFrom<RawRecord> for RawTransaction {
    type Error = String;

    fn try_from(record: RawRecord) -> std::result::Result<Self, String> {
        if let Some(txid) = record.txid {
            let amount = record.amount.ok_or("hierarchical record without amount")?;
            let fee = u64::try_from(record.fee)
                .map_err(|_| format!("fee {} out of range for {}", record.fee, txid))?;
            return Ok(RawTransaction::Hierarchical(RawHierarchicalTx {
                txid,
                timestamp: record.timestamp,
                confirmations: record.confirmations,
                fee,
                amount,
                inputs: record.inputs,
                outputs: record.outputs,
            }));
        }

        let hash = record.hash.ok_or("record has neither txid nor hash")?;
        match (record.from, record.to, record.value) {
            (Some(from), Some(to), Some(value)) => Ok(RawTransaction::Account(RawAccountTx {
                hash,
                timestamp: record.timestamp,
                confirmations: record.confirmations,
                from,
                to,
                value,
                fee: record.fee,
                outgoing: record.outgoing,
            })),
            _ => Err(format!("account record {} needs from, to and value", hash)),
        }
    }
}

impl<'de> Deserialize<'de> for RawTransaction {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawRecord::deserialize(deserializer)?
            .try_into()
            .map_err(de::Error::custom)
    }
}

/// Direction of value flow from the wallet's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Funds received
    Incoming,
    /// Funds sent
    Outgoing,
    /// Sent to the wallet's own addresses
    #[serde(rename = "self")]
    SelfTransfer,
}

/// Network-agnostic transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    /// Transaction id
    pub id: String,
    /// Network the transaction belongs to
    pub network: NetworkName,
    /// Block time
    pub timestamp: Option<DateTime<Utc>>,
    /// Confirmation depth
    pub confirmations: u32,
    /// Depth the network requires
    pub min_conf: u32,
    /// `confirmations >= min_conf`
    pub is_confirmed: bool,
    /// Direction
    pub direction: Direction,
    /// Net balance change in the smallest unit, fee included
    pub amount: i128,
    /// Fee paid
    pub fee: u128,
    /// Inputs
    pub inputs: Vec<TxEndpoint>,
    /// Outputs
    pub outputs: Vec<TxEndpoint>,
}

/// Map a raw record onto the canonical shape.
///
/// Fails with [`Error::InvalidTransaction`] when an amount does not fit the
/// signed canonical range.
///
/// # Panics
///
/// Panics if the record's family differs from `network`'s family. A session
/// only hands its own backend's records to the normalizer, so a mismatch is a
/// broken caller rather than bad input.
pub fn normalize(raw: &RawTransaction, network: NetworkName) -> Result<CanonicalTransaction> {
    let policy = ConfirmationPolicy::for_network(network);
    match (raw, network.family()) {
        (RawTransaction::Hierarchical(tx), NetworkFamily::Hierarchical) => {
            Ok(normalize_hierarchical(tx, network, policy))
        }
        (RawTransaction::Account(tx), NetworkFamily::AccountModel) => {
            normalize_account(tx, network, policy)
        }
        (raw, family) => panic!(
            "{:?} record passed to normalizer for {} ({:?} family)",
            raw.family(),
            network,
            family
        ),
    }
}

fn normalize_hierarchical(
    tx: &RawHierarchicalTx,
    network: NetworkName,
    policy: ConfirmationPolicy,
) -> CanonicalTransaction {
    let direction = if tx.amount > 0 {
        Direction::Incoming
    } else if tx.amount.unsigned_abs() == tx.fee {
        // Only the fee left the wallet
        Direction::SelfTransfer
    } else {
        Direction::Outgoing
    };

    CanonicalTransaction {
        id: tx.txid.clone(),
        network,
        timestamp: tx.timestamp.and_then(block_time),
        confirmations: tx.confirmations,
        min_conf: policy.min_conf,
        is_confirmed: policy.is_confirmed(tx.confirmations),
        direction,
        amount: i128::from(tx.amount),
        fee: u128::from(tx.fee),
        inputs: tx.inputs.clone(),
        outputs: tx.outputs.clone(),
    }
}

fn normalize_account(
    tx: &RawAccountTx,
    network: NetworkName,
    policy: ConfirmationPolicy,
) -> Result<CanonicalTransaction> {
    let value = signed_amount(tx.value, &tx.hash)?;
    let fee = signed_amount(tx.fee, &tx.hash)?;
    let (direction, amount) = if tx.from.eq_ignore_ascii_case(&tx.to) {
        (Direction::SelfTransfer, -fee)
    } else if tx.outgoing {
        let spent = value.checked_add(fee).ok_or_else(|| {
            Error::InvalidTransaction(format!("value plus fee overflows in {}", tx.hash))
        })?;
        (Direction::Outgoing, -spent)
    } else {
        (Direction::Incoming, value)
    };

    Ok(CanonicalTransaction {
        id: tx.hash.clone(),
        network,
        timestamp: tx.timestamp.and_then(block_time),
        confirmations: tx.confirmations,
        min_conf: policy.min_conf,
        is_confirmed: policy.is_confirmed(tx.confirmations),
        direction,
        amount,
        fee: tx.fee,
        inputs: vec![TxEndpoint {
            address: tx.from.clone(),
            amount: tx.value,
        }],
        outputs: vec![TxEndpoint {
            address: tx.to.clone(),
            amount: tx.value,
        }],
    })
}

fn block_time(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

fn signed_amount(value: u128, id: &str) -> Result<i128> {
    i128::try_from(value).map_err(|_| {
        Error::InvalidTransaction(format!("amount {} out of range in {}", value, id))
    })
}
