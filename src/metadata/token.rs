use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a type known to a [`crate::metadata::typesystem::TypeRegistry`].
///
/// Tokens follow the .NET metadata layout:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
///
/// Corelib primitives live in the synthetic `0xF0` table so they never collide with rows of
/// real metadata tables.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Table id of `TypeRef` rows
    pub const TABLE_TYPE_REF: u8 = 0x01;
    /// Table id of `TypeDef` rows
    pub const TABLE_TYPE_DEF: u8 = 0x02;
    /// Table id of `GenericParam` rows
    pub const TABLE_GENERIC_PARAM: u8 = 0x2A;
    /// Synthetic table id for corelib primitives
    pub const TABLE_PRIMITIVE: u8 = 0xF0;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table id and a row index; the row is truncated to 24 bits
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Token of the `row`-th `TypeDef`
    #[must_use]
    pub fn type_def(row: u32) -> Self {
        Self::from_parts(Self::TABLE_TYPE_DEF, row)
    }

    /// Token of the `row`-th `TypeRef`
    #[must_use]
    pub fn type_ref(row: u32) -> Self {
        Self::from_parts(Self::TABLE_TYPE_REF, row)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if this token names a corelib primitive
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.table() == Self::TABLE_PRIMITIVE
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parts() {
        let token = Token::type_def(5);
        assert_eq!(token.value(), 0x0200_0005);
        assert_eq!(token.table(), Token::TABLE_TYPE_DEF);
        assert_eq!(token.row(), 5);

        let truncated = Token::from_parts(0x01, 0x1FF_FFFF);
        assert_eq!(truncated.row(), 0x00FF_FFFF);
        assert_eq!(truncated.table(), 0x01);
    }

    #[test]
    fn test_token_kinds() {
        assert!(Token(0).is_null());
        assert!(!Token::type_ref(1).is_null());
        assert!(Token(0xF000_0008).is_primitive());
        assert!(!Token::type_def(8).is_primitive());
    }

    #[test]
    fn test_token_conversion_and_display() {
        let token: Token = 0x0600_0001u32.into();
        assert_eq!(u32::from(token), 0x0600_0001);
        assert_eq!(format!("{}", token), "0x06000001");
        assert_eq!(
            format!("{:?}", token),
            "Token(0x06000001, table: 0x06, row: 1)"
        );
    }

    #[test]
    fn test_token_ordering() {
        let mut tokens = vec![Token::type_def(3), Token::type_ref(9), Token::type_def(1)];
        tokens.sort();
        assert_eq!(
            tokens,
            vec![Token::type_ref(9), Token::type_def(1), Token::type_def(3)]
        );
    }
}
