use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::common::errors::{Error, Result};
use crate::common::traits::Exchange;
use crate::common::types::{WithdrawalDecision, WithdrawalSpec};
use crate::sizing::{assess_withdrawal, QuantizationContext, DEFAULT_MAX_FEE_PERCENT};

/// A withdrawal as entered on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawRequest {
    pub asset: String,
    /// `None` withdraws the exchange minimum
    pub amount: Option<String>,
    /// Name of the withdrawal address saved on the exchange
    pub withdrawal_key: String,
    /// Highest acceptable fee, in percent of the amount
    pub max_fee: String,
    pub validate: bool,
}

impl WithdrawRequest {
    pub fn new(asset: impl Into<String>, withdrawal_key: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            amount: None,
            withdrawal_key: withdrawal_key.into(),
            max_fee: DEFAULT_MAX_FEE_PERCENT.to_string(),
            validate: false,
        }
    }
}

/// Result of a withdrawal attempt
#[derive(Debug, Clone)]
pub struct WithdrawOutcome {
    pub withdrawal: WithdrawalSpec,
    /// Exchange reference, `None` when blocked or only validating
    pub reference: Option<String>,
}

/// Withdraw crypto if the fee is within the user's ceiling
///
/// A fee above the ceiling is logged as a warning and nothing is requested;
/// the outcome still carries both percentages and the net amount.
#[instrument(skip(exchange, ctx, request), fields(exchange = exchange.exchange_name(), asset = %request.asset))]
pub async fn withdraw_crypto<E>(
    exchange: &E,
    ctx: &QuantizationContext,
    request: &WithdrawRequest,
) -> Result<WithdrawOutcome>
where
    E: Exchange + ?Sized,
{
    let amount = request
        .amount
        .as_deref()
        .map(|amount| ctx.quantize(amount))
        .transpose()?;
    if let Some(amount) = amount.filter(|a| *a < Decimal::ZERO) {
        return Err(Error::InvalidAmount(amount));
    }
    let max_fee = ctx.quantize(request.max_fee.as_str())?;

    let quote = exchange
        .withdrawal_quote(&request.asset, &request.withdrawal_key, amount)
        .await?;
    let withdrawal = assess_withdrawal(ctx, &request.asset, amount, &quote, max_fee)?;
    info!("Assessed {}", withdrawal);

    if withdrawal.decision == WithdrawalDecision::Blocked {
        warn!(
            "Withdrawal fee of {}% exceeds the maximum of {}%, not withdrawing {} {}",
            withdrawal.fee_percent, withdrawal.max_fee_percent, withdrawal.amount, withdrawal.asset
        );
        return Ok(WithdrawOutcome {
            withdrawal,
            reference: None,
        });
    }

    if request.validate {
        info!("Validate only, withdrawal not requested");
        return Ok(WithdrawOutcome {
            withdrawal,
            reference: None,
        });
    }

    let reference = exchange
        .submit_withdrawal(&withdrawal.asset, &request.withdrawal_key, withdrawal.amount)
        .await?;
    info!(
        "Withdrawal of {} {} requested, {} will be credited (reference {})",
        withdrawal.amount, withdrawal.asset, withdrawal.net_amount, reference
    );

    Ok(WithdrawOutcome {
        withdrawal,
        reference: Some(reference),
    })
}
