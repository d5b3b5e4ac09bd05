//! The split calculator.
//!
//! Pure partitioning of an expense amount among members. This is the only
//! place split shares are produced or validated; callers persist the result
//! as-is, so the invariant "split sum equals the expense amount exactly"
//! is enforced here and nowhere else.

use std::collections::HashSet;

use crate::{EngineError, MoneyCents, ResultEngine, Split, SplitKind, commands::SplitValue};

/// Computes the validated split list for an expense.
///
/// `total` must be positive (the caller validates the raw input). For
/// [`SplitKind::Equal`], `split_with` optionally narrows the members who
/// share the expense; for [`SplitKind::Custom`], `explicit` carries the
/// caller-supplied shares. Validation fails fast on the first violated rule:
///
/// 1. explicit shares present and non-empty (custom only)
/// 2. every referenced member belongs to the group
/// 3. no member appears twice
/// 4. every share is a finite amount ≥ 0 (custom only)
/// 5. the shares sum to `total` exactly (custom only; equal splits are
///    exact by construction)
pub fn compute_splits(
    kind: SplitKind,
    total: MoneyCents,
    group_members: &[String],
    split_with: Option<&[String]>,
    explicit: Option<&[SplitValue]>,
) -> ResultEngine<Vec<Split>> {
    match kind {
        SplitKind::Equal => {
            let candidates = resolve_members(group_members, split_with)?;
            equal_splits(candidates, total)
        }
        SplitKind::Custom => {
            let shares = explicit.filter(|s| !s.is_empty()).ok_or_else(|| {
                EngineError::EmptySplitTarget("custom split values are required".to_string())
            })?;
            custom_splits(total, group_members, shares)
        }
    }
}

/// Resolves which members an equal split targets.
///
/// A supplied subset is deduplicated (keeping order) and checked against the
/// group membership; no subset means the full membership.
fn resolve_members(
    group_members: &[String],
    split_with: Option<&[String]>,
) -> ResultEngine<Vec<String>> {
    let candidates: Vec<String> = match split_with {
        Some(requested) if !requested.is_empty() => {
            let mut seen = HashSet::new();
            requested
                .iter()
                .filter(|member| seen.insert(member.as_str()))
                .cloned()
                .collect()
        }
        _ => group_members.to_vec(),
    };

    let membership: HashSet<&str> = group_members.iter().map(String::as_str).collect();
    for member in &candidates {
        if !membership.contains(member.as_str()) {
            return Err(EngineError::InvalidMember(member.clone()));
        }
    }

    if candidates.is_empty() {
        return Err(EngineError::EmptySplitTarget(
            "at least one member is required in split".to_string(),
        ));
    }

    Ok(candidates)
}

/// Divides `total` evenly among `members`, in their iteration order.
///
/// Every member gets `total / n` put through the same boundary rounding as
/// caller-supplied decimals ([`MoneyCents::from_major`]); whatever slack the
/// rounding leaves (positive or negative) goes entirely to the **first**
/// member. The shares therefore sum to `total` exactly for any member count.
///
/// Going through the decimal rounding matters for penny placement: a half
/// cent sitting just below .5 in binary (4.27 / 2 is 2.1349999...) rounds
/// down, so the first member absorbs +0.01 rather than giving one up.
fn equal_splits(members: Vec<String>, total: MoneyCents) -> ResultEngine<Vec<Split>> {
    let n = members.len() as i64;
    let base = MoneyCents::from_major(total.to_major() / n as f64)?;
    let delta = total - MoneyCents::new(base.cents() * n);

    let mut splits: Vec<Split> = members
        .into_iter()
        .map(|member| Split {
            member,
            amount: base,
        })
        .collect();
    if !delta.is_zero() {
        splits[0].amount += delta;
    }

    Ok(splits)
}

/// Validates caller-supplied custom shares against the group and the total.
///
/// Mismatched totals are a hard rejection; nothing is redistributed.
fn custom_splits(
    total: MoneyCents,
    group_members: &[String],
    shares: &[SplitValue],
) -> ResultEngine<Vec<Split>> {
    let membership: HashSet<&str> = group_members.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut splits = Vec::with_capacity(shares.len());

    for share in shares {
        if !membership.contains(share.member.as_str()) {
            return Err(EngineError::InvalidMember(share.member.clone()));
        }
        if !seen.insert(share.member.as_str()) {
            return Err(EngineError::DuplicateMember(share.member.clone()));
        }
        if !share.amount.is_finite() || share.amount < 0.0 {
            return Err(EngineError::InvalidAmount(
                "split amount must be 0 or greater".to_string(),
            ));
        }
        splits.push(Split {
            member: share.member.clone(),
            amount: MoneyCents::from_major(share.amount)?,
        });
    }

    let sum = splits
        .iter()
        .fold(MoneyCents::ZERO, |acc, split| acc + split.amount);
    if sum != total {
        return Err(EngineError::SplitMismatch(format!(
            "split total {sum} must match expense amount {total}"
        )));
    }

    Ok(splits)
}
