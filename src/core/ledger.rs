use std::collections::HashMap;

use tracing::debug;

use crate::constants::SPLIT_TOLERANCE;
use crate::core::models::{
    BalanceEntry, Debt, PairwiseBalances, Transaction, TransactionKind, TransactionStats, User,
};

/// Folds a snapshot of transactions into a symmetric pairwise ledger.
///
/// Balance slots exist only for the users supplied; a transaction naming an
/// id outside that set contributes nothing for that pair. In the result, a
/// positive amount against another user means that user owes this one.
/// Exact-zero pairs are dropped, and entry order follows the order of
/// `users`.
///
/// Per transaction kind:
/// - expense: the amount is split evenly across `split_between`; each
///   participant other than the payer owes the payer one share. A payer who
///   is also a participant gets no entry against themselves.
/// - settlement: cash moves payer to payee, so the payer's debt toward
///   the payee shrinks; an exact repayment clears the pair.
/// - loan: cash also moves payer to payee, leaving the payee owing the
///   payer. Loans differ from settlements in intent and statistics, not
///   arithmetic.
pub fn compute_balances(transactions: &[Transaction], users: &[User]) -> PairwiseBalances {
    debug!(
        transactions = transactions.len(),
        users = users.len(),
        "computing pairwise balances"
    );

    let mut ledger: HashMap<&str, HashMap<&str, f64>> = HashMap::with_capacity(users.len());
    for user in users {
        let mut row = HashMap::with_capacity(users.len().saturating_sub(1));
        for other in users {
            if other.id != user.id {
                row.insert(other.id.as_str(), 0.0);
            }
        }
        ledger.insert(user.id.as_str(), row);
    }

    for tx in transactions {
        match tx.kind {
            TransactionKind::Expense => {
                if tx.split_between.is_empty() {
                    continue;
                }
                let share = tx.amount / tx.split_between.len() as f64;
                for participant in &tx.split_between {
                    if *participant == tx.paid_by {
                        continue;
                    }
                    transfer(&mut ledger, participant, &tx.paid_by, -share);
                }
            }
            // Both move cash from payer to payee: a repayment shrinks the
            // payer's debt, a loan leaves the payee owing the payer.
            TransactionKind::Settlement | TransactionKind::Loan => {
                if let Some(paid_to) = &tx.paid_to {
                    transfer(&mut ledger, &tx.paid_by, paid_to, tx.amount);
                }
            }
        }
    }

    let mut balances = PairwiseBalances::with_capacity(users.len());
    for user in users {
        let Some(row) = ledger.get(user.id.as_str()) else {
            continue;
        };
        let entries = users
            .iter()
            .filter(|other| other.id != user.id)
            .filter_map(|other| {
                let amount = row.get(other.id.as_str()).copied().unwrap_or(0.0);
                (amount != 0.0).then(|| BalanceEntry {
                    user_id: other.id.clone(),
                    amount,
                })
            })
            .collect();
        balances.insert(user.id.clone(), entries);
    }
    balances
}

/// Adjusts `from`'s balance toward `to` by `delta`, keeping the mirror
/// entry in sync. Pairs with either side unknown are left untouched.
fn transfer(ledger: &mut HashMap<&str, HashMap<&str, f64>>, from: &str, to: &str, delta: f64) {
    if from == to {
        return;
    }
    match ledger.get_mut(from).and_then(|row| row.get_mut(to)) {
        Some(cell) => *cell += delta,
        None => return,
    }
    if let Some(cell) = ledger.get_mut(to).and_then(|row| row.get_mut(from)) {
        *cell -= delta;
    }
}

/// Flattens every negative pairwise entry into a debt, largest first.
///
/// This is a direct projection of the ledger, not a minimum-transaction
/// plan; see [`min_cash_flow`] for the netting variant.
pub fn settlement_plan(balances: &PairwiseBalances) -> Vec<Debt> {
    let mut debts: Vec<Debt> = balances
        .iter()
        .flat_map(|(user_id, entries)| {
            entries
                .iter()
                .filter(|entry| entry.amount < 0.0)
                .map(move |entry| Debt {
                    from: user_id.clone(),
                    to: entry.user_id.clone(),
                    amount: entry.amount.abs(),
                })
        })
        .collect();

    debts.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
    });
    debts
}

/// Greedy largest-creditor / largest-debtor matching over net positions.
/// Produces at most `users - 1` transfers where [`settlement_plan`] can
/// produce one per indebted pair.
pub fn min_cash_flow(balances: &PairwiseBalances) -> Vec<Debt> {
    let mut net: HashMap<&str, f64> = HashMap::with_capacity(balances.len());
    for (user_id, entries) in balances {
        let total: f64 = entries.iter().map(|entry| entry.amount).sum();
        net.insert(user_id.as_str(), total);
    }

    let mut creditors: Vec<(&str, f64)> = net
        .iter()
        .filter(|(_, amount)| **amount > SPLIT_TOLERANCE)
        .map(|(id, amount)| (*id, *amount))
        .collect();
    let mut debtors: Vec<(&str, f64)> = net
        .iter()
        .filter(|(_, amount)| **amount < -SPLIT_TOLERANCE)
        .map(|(id, amount)| (*id, -*amount))
        .collect();

    creditors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    debtors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut plan = Vec::new();
    let mut i = 0;
    let mut j = 0;
    while i < debtors.len() && j < creditors.len() {
        let settled = debtors[i].1.min(creditors[j].1);
        if settled > SPLIT_TOLERANCE {
            plan.push(Debt {
                from: debtors[i].0.to_string(),
                to: creditors[j].0.to_string(),
                amount: settled,
            });
        }
        debtors[i].1 -= settled;
        creditors[j].1 -= settled;
        if debtors[i].1 < SPLIT_TOLERANCE {
            i += 1;
        }
        if creditors[j].1 < SPLIT_TOLERANCE {
            j += 1;
        }
    }

    debug!(transfers = plan.len(), "minimized cash flow");
    plan
}

/// Sum of everything `user_id` owes to others.
pub fn total_owed_by(user_id: &str, balances: &PairwiseBalances) -> f64 {
    balances
        .get(user_id)
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| entry.amount < 0.0)
                .map(|entry| entry.amount.abs())
                .sum()
        })
        .unwrap_or(0.0)
}

/// Sum of everything others owe to `user_id`.
pub fn total_owed_to(user_id: &str, balances: &PairwiseBalances) -> f64 {
    balances
        .get(user_id)
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| entry.amount > 0.0)
                .map(|entry| entry.amount)
                .sum()
        })
        .unwrap_or(0.0)
}

/// Signed balance `user_id` holds against `other_id`; zero when the pair is
/// settled or unknown.
pub fn balance_between(balances: &PairwiseBalances, user_id: &str, other_id: &str) -> f64 {
    balances
        .get(user_id)
        .and_then(|entries| entries.iter().find(|entry| entry.user_id == other_id))
        .map(|entry| entry.amount)
        .unwrap_or(0.0)
}

/// Folds per-user totals and counts out of a transaction history.
///
/// Polarity follows the ledger rules; an expense counts toward the user
/// only when the user is one of its participants.
pub fn transaction_stats(transactions: &[Transaction], user_id: &str) -> TransactionStats {
    let mut stats = TransactionStats::default();

    for tx in transactions {
        let is_payer = tx.paid_by == user_id;
        let is_payee = tx.paid_to.as_deref() == Some(user_id);

        match tx.kind {
            TransactionKind::Expense => {
                if is_payer {
                    stats.total_paid += tx.amount;
                }
                if tx.split_between.iter().any(|id| id == user_id) {
                    stats.total_spent += tx.amount / tx.split_between.len() as f64;
                    stats.expense_count += 1;
                }
            }
            TransactionKind::Settlement => {
                if is_payer {
                    stats.total_paid += tx.amount;
                }
                if is_payee {
                    stats.total_received += tx.amount;
                }
                if is_payer || is_payee {
                    stats.settlement_count += 1;
                }
            }
            TransactionKind::Loan => {
                if is_payer {
                    stats.total_loaned += tx.amount;
                }
                if is_payee {
                    stats.total_borrowed += tx.amount;
                }
                if is_payer || is_payee {
                    stats.loan_count += 1;
                }
            }
        }
    }

    stats
}
