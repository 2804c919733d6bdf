//! Decoding of the compact move strings the backend sends (`e2e4`,
//! `e7e8q`).

use shakmaty::{Role, uci::UciMove};

use crate::{error::ClientError, types::MoveRequest};

/// Decode an encoded move into a [`MoveRequest`].
///
/// Only the shape is checked here. Whether the move is legal is decided
/// when it is applied to a position. Null moves and drops are rejected,
/// as is a promotion to anything but a queen, rook, bishop or knight.
pub fn decode(encoded: &str) -> Result<MoveRequest, ClientError> {
    let malformed = || ClientError::MalformedEncoding(encoded.to_owned());

    let uci: UciMove = encoded
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| malformed())?;

    match uci {
        UciMove::Normal {
            from,
            to,
            promotion:
                promotion @ (None | Some(Role::Queen | Role::Rook | Role::Bishop | Role::Knight)),
        } => Ok(MoveRequest {
            from,
            to,
            promotion,
        }),
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use shakmaty::Square;

    use super::*;

    #[test]
    fn decodes_plain_move() {
        let m = decode("e2e4").unwrap();
        assert_eq!(m, MoveRequest::new(Square::E2, Square::E4));
    }

    #[test]
    fn decodes_promotion() {
        let m = decode("e7e8q").unwrap();
        assert_eq!(m.from, Square::E7);
        assert_eq!(m.to, Square::E8);
        assert_eq!(m.promotion, Some(Role::Queen));

        assert_eq!(decode("a2a1N").unwrap().promotion, Some(Role::Knight));
    }

    #[test]
    fn rejects_short_strings() {
        assert!(matches!(decode("e2e"), Err(ClientError::MalformedEncoding(_))));
        assert!(matches!(decode(""), Err(ClientError::MalformedEncoding(_))));
    }

    #[test]
    fn rejects_bad_squares_and_letters() {
        assert!(decode("i2i4").is_err());
        assert!(decode("e0e4").is_err());
        assert!(decode("e7e8k").is_err());
        assert!(decode("e7e8x").is_err());
        assert!(decode("e2e4e5").is_err());
        assert!(decode("é2e4").is_err());
    }

    #[test]
    fn rejects_null_moves_and_drops() {
        assert!(matches!(decode("0000"), Err(ClientError::MalformedEncoding(_))));
        assert!(matches!(decode("P@e4"), Err(ClientError::MalformedEncoding(_))));
    }
}
