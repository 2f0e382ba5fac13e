use crate::services::error::{ServiceError, ServiceResult};
use log::debug;
use models::codes::CodeKind;
use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

/// Upper bound on generate-and-check rounds before giving up
pub const MAX_ATTEMPTS: u32 = 1000;

/// Supplies the random digit suffix of a generated code
pub trait SuffixSource: Send {
    fn next_suffix(&mut self, digits: usize) -> String;
}

/// Uniformly random, zero-padded digits
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSuffix;

impl SuffixSource for RandomSuffix {
    fn next_suffix(&mut self, digits: usize) -> String {
        let upper = 10u64.pow(digits as u32);
        let n = rand::thread_rng().gen_range(0..upper);
        format!("{n:0digits$}")
    }
}

/// Draws codes until one is not present in `column` of `E`
///
/// The check runs on `conn`, which should be the transaction that will insert
/// the row so that codes taken earlier in the same transaction are seen.
pub async fn generate_unique_code<E, C>(
    conn: &C,
    column: E::Column,
    kind: CodeKind,
    infix: Option<&str>,
    source: &mut dyn SuffixSource,
) -> ServiceResult<String>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let code = kind.format(infix, &source.next_suffix(kind.digits()));

        let taken = E::find()
            .filter(column.eq(code.as_str()))
            .count(conn)
            .await?;

        if taken == 0 {
            return Ok(code);
        }

        debug!("Code {code} already taken (attempt {attempt})");
    }

    Err(ServiceError::CodeSpaceExhausted {
        prefix: kind.prefix(),
        attempts: MAX_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_suffix_is_zero_padded() {
        let mut source = RandomSuffix;
        for _ in 0..100 {
            let suffix = source.next_suffix(6);
            assert_eq!(suffix.len(), 6);
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
