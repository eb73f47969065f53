use crate::chess::{Move, ParsePromotionError, ParseSquareError, Promotion, Square};
use derive_more::{Display, Error};
use serde::Deserialize;

/// A move as submitted by a participant, such as through a modal form.
///
/// Squares are given in algebraic notation, the promotion by name or letter.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MoveRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub promotion: Option<String>,
}

/// The reason why a [`MoveRequest`] does not describe a [`Move`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseMoveRequestError {
    #[display(fmt = "invalid origin square")]
    InvalidOrigin(ParseSquareError),
    #[display(fmt = "invalid destination square")]
    InvalidDestination(ParseSquareError),
    #[display(fmt = "invalid promotion")]
    InvalidPromotion(ParsePromotionError),
}

impl TryFrom<&MoveRequest> for Move {
    type Error = ParseMoveRequestError;

    fn try_from(r: &MoveRequest) -> Result<Self, Self::Error> {
        use ParseMoveRequestError::*;

        let whence: Square = r.origin.trim().to_ascii_lowercase().parse().map_err(InvalidOrigin)?;
        let whither: Square = r
            .destination
            .trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(InvalidDestination)?;

        let promotion = match &r.promotion {
            None => Promotion::None,
            Some(p) => p.trim().parse().map_err(InvalidPromotion)?,
        };

        Ok(Move(whence, whither, promotion))
    }
}

impl TryFrom<MoveRequest> for Move {
    type Error = ParseMoveRequestError;

    fn try_from(r: MoveRequest) -> Result<Self, Self::Error> {
        Move::try_from(&r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    fn request(origin: &str, destination: &str, promotion: Option<&str>) -> MoveRequest {
        MoveRequest {
            origin: origin.into(),
            destination: destination.into(),
            promotion: promotion.map(String::from),
        }
    }

    #[proptest]
    fn request_with_printed_squares_converts_to_move(m: Move) {
        let p = m.promotion().to_string();
        let r = request(&m.whence().to_string(), &m.whither().to_string(), Some(&p));
        assert_eq!(Move::try_from(&r), Ok(m));
    }

    #[test]
    fn request_is_deserialized_from_camel_case_fields() {
        let r: MoveRequest =
            serde_json::from_str(r#"{"origin":"e7","destination":"e8","promotion":"knight"}"#)
                .unwrap();

        assert_eq!(r, request("e7", "e8", Some("knight")));
        assert_eq!(
            Move::try_from(r),
            Ok(Move(Square::E7, Square::E8, Promotion::Knight))
        );
    }

    #[test]
    fn promotion_is_optional() {
        let r: MoveRequest = serde_json::from_str(r#"{"origin":"e2","destination":"e4"}"#).unwrap();
        assert_eq!(
            Move::try_from(r),
            Ok(Move(Square::E2, Square::E4, Promotion::None))
        );
    }

    #[test]
    fn squares_are_case_and_whitespace_insensitive() {
        assert_eq!(
            Move::try_from(request(" E2", "e4 ", None)),
            Ok(Move(Square::E2, Square::E4, Promotion::None))
        );
    }

    #[test]
    fn invalid_fields_are_reported() {
        assert!(matches!(
            Move::try_from(request("z9", "e4", None)),
            Err(ParseMoveRequestError::InvalidOrigin(_))
        ));

        assert!(matches!(
            Move::try_from(request("e2", "e", None)),
            Err(ParseMoveRequestError::InvalidDestination(_))
        ));

        assert!(matches!(
            Move::try_from(request("e7", "e8", Some("king"))),
            Err(ParseMoveRequestError::InvalidPromotion(_))
        ));
    }
}
