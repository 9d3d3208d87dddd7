//! In-process ledger simulation
//!
//! Mirrors the settlement contract closely enough for development and tests:
//! balances live in neuron (1 OG = 10^18 neuron) as big integers, ledger
//! creation enforces the 3 OG floor, and sub-account funds count as locked
//! until retrieved.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use num_bigint::{BigInt, Sign};
use rust_decimal::prelude::*;

use super::{Broker, BrokerError, BrokerValue, MIN_LEDGER_OG, OgAmount, ServiceType};

/// Neuron per OG
pub const NEURON_PER_OG: u64 = 1_000_000_000_000_000_000;

const ERR_NO_LEDGER: &str = "Ledger does not exist";
const ERR_INSUFFICIENT: &str = "Insufficient balance";
const ERR_BELOW_NEURON: &str = "Amount below 1 neuron";

#[derive(Debug, Default)]
struct LedgerAccount {
    total: BigInt,
    sub_accounts: BTreeMap<ServiceType, BigInt>,
}

impl LedgerAccount {
    fn locked(&self) -> BigInt {
        self.sub_accounts.values().sum()
    }

    fn available(&self) -> BigInt {
        &self.total - self.locked()
    }

    fn sub_account_row(&self, service: ServiceType) -> Option<BrokerValue> {
        self.sub_accounts.get(&service).map(|balance| {
            BrokerValue::List(vec![
                BrokerValue::from(service.as_str()),
                BrokerValue::Integer(balance.clone()),
            ])
        })
    }

    fn snapshot(&self) -> BrokerValue {
        let infers = self
            .sub_account_row(ServiceType::Inference)
            .into_iter()
            .collect::<Vec<_>>();
        // No fine-tuning sub-account reads as null, not an empty list
        let fines = self
            .sub_account_row(ServiceType::FineTuning)
            .map(|row| BrokerValue::List(vec![row]))
            .unwrap_or(BrokerValue::Null);

        BrokerValue::map([
            (
                "ledgerInfo",
                BrokerValue::List(vec![
                    BrokerValue::Integer(self.total.clone()),
                    BrokerValue::Integer(self.locked()),
                ]),
            ),
            ("infers", BrokerValue::List(infers)),
            ("fines", fines),
        ])
    }
}

/// Single-ledger broker kept in memory
#[derive(Debug, Default)]
pub struct MemoryBroker {
    ledger: Mutex<Option<LedgerAccount>>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock ledger funds into a sub-account, as service usage does on-chain.
    pub fn transfer_to_sub_account(
        &self,
        service: ServiceType,
        amount: OgAmount,
    ) -> Result<String, BrokerError> {
        let neuron = og_to_neuron(amount)?;
        self.with_ledger(|ledger| {
            if ledger.available() < neuron {
                return Err(BrokerError::Rejected(ERR_INSUFFICIENT.to_string()));
            }
            *ledger.sub_accounts.entry(service).or_default() += &neuron;
            Ok(format!("Transferred {} OG to {} sub-account", amount, service))
        })
    }

    fn with_ledger<R>(
        &self,
        f: impl FnOnce(&mut LedgerAccount) -> Result<R, BrokerError>,
    ) -> Result<R, BrokerError> {
        let mut guard = self
            .ledger
            .lock()
            .map_err(|_| BrokerError::Unavailable("ledger state poisoned".to_string()))?;
        let ledger = guard
            .as_mut()
            .ok_or_else(|| BrokerError::Rejected(ERR_NO_LEDGER.to_string()))?;
        f(ledger)
    }
}

#[async_trait]
impl Broker for MemoryBroker {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn deposit_funds(&self, amount: OgAmount) -> Result<String, BrokerError> {
        let neuron = og_to_neuron(amount)?;
        self.with_ledger(|ledger| {
            ledger.total += neuron;
            Ok(format!("Deposited {} OG to ledger", amount))
        })
    }

    async fn get_balance(&self) -> Result<BrokerValue, BrokerError> {
        self.with_ledger(|ledger| Ok(ledger.snapshot()))
    }

    async fn request_refund(&self, amount: OgAmount) -> Result<String, BrokerError> {
        let neuron = og_to_neuron(amount)?;
        self.with_ledger(|ledger| {
            if ledger.available() < neuron {
                return Err(BrokerError::Rejected(ERR_INSUFFICIENT.to_string()));
            }
            ledger.total -= neuron;
            Ok(format!("Refunded {} OG from ledger", amount))
        })
    }

    async fn add_funds_to_ledger(&self, amount: OgAmount) -> Result<String, BrokerError> {
        if amount.value() < MIN_LEDGER_OG {
            return Err(BrokerError::Rejected(format!(
                "Minimum {} OG required to create ledger",
                MIN_LEDGER_OG
            )));
        }
        let neuron = og_to_neuron(amount)?;
        let mut guard = self
            .ledger
            .lock()
            .map_err(|_| BrokerError::Unavailable("ledger state poisoned".to_string()))?;
        if guard.is_some() {
            return Err(BrokerError::Rejected("Ledger already exists".to_string()));
        }
        *guard = Some(LedgerAccount {
            total: neuron,
            sub_accounts: BTreeMap::new(),
        });
        Ok(format!("Ledger created with {} OG", amount))
    }

    async fn retrieve_funds(&self, service: ServiceType) -> Result<String, BrokerError> {
        self.with_ledger(|ledger| {
            let retrieved = ledger.sub_accounts.remove(&service).unwrap_or_default();
            Ok(format!(
                "Retrieved {} OG from {} sub-account",
                format_og(&retrieved),
                service
            ))
        })
    }

    async fn delete_ledger(&self) -> Result<String, BrokerError> {
        let mut guard = self
            .ledger
            .lock()
            .map_err(|_| BrokerError::Unavailable("ledger state poisoned".to_string()))?;
        let ledger = guard
            .as_ref()
            .ok_or_else(|| BrokerError::Rejected(ERR_NO_LEDGER.to_string()))?;
        if ledger.locked().sign() != Sign::NoSign {
            return Err(BrokerError::Rejected(
                "Sub-account funds must be retrieved before deleting the ledger".to_string(),
            ));
        }
        let returned = format_og(&ledger.total);
        *guard = None;
        Ok(format!("Ledger deleted, {} OG returned to wallet", returned))
    }
}

// ============================================================================
// Unit Conversion
// ============================================================================

/// OG → neuron. Fractions of a neuron are truncated; an amount that
/// truncates to nothing is refused.
pub fn og_to_neuron(amount: OgAmount) -> Result<BigInt, BrokerError> {
    let out_of_range = || BrokerError::Rejected(format!("Amount out of range: {}", amount));
    let neuron = Decimal::from_f64(amount.value())
        .and_then(|d| d.checked_mul(Decimal::from(NEURON_PER_OG)))
        .and_then(|d| d.trunc().normalize().to_string().parse::<BigInt>().ok())
        .ok_or_else(out_of_range)?;
    if neuron.sign() == Sign::NoSign {
        return Err(BrokerError::Rejected(ERR_BELOW_NEURON.to_string()));
    }
    Ok(neuron)
}

/// neuron → OG decimal string without trailing zeros
pub fn format_og(neuron: &BigInt) -> String {
    let scale = BigInt::from(NEURON_PER_OG);
    let sign = if neuron.sign() == Sign::Minus { "-" } else { "" };
    let magnitude = BigInt::from(neuron.magnitude().clone());
    let whole = &magnitude / &scale;
    let frac = &magnitude % &scale;
    if frac.sign() == Sign::NoSign {
        return format!("{}{}", sign, whole);
    }
    let frac_str = format!("{:0>18}", frac.to_string());
    format!("{}{}.{}", sign, whole, frac_str.trim_end_matches('0'))
}
