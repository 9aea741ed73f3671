use std::fmt;
use std::str::FromStr;

/// Backend tables exposed through the REST layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Products,
    Movements,
    Locations,
    Profiles,
    AuditLog,
    Blocks,
    Slabs,
    Tiles,
}

impl Resource {
    pub const ALL: [Self; 8] = [
        Self::Products,
        Self::Movements,
        Self::Locations,
        Self::Profiles,
        Self::AuditLog,
        Self::Blocks,
        Self::Slabs,
        Self::Tiles,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            Self::Products => "produtos",
            Self::Movements => "movimentacoes",
            Self::Locations => "locais",
            Self::Profiles => "profiles",
            Self::AuditLog => "audit_log",
            Self::Blocks => "blocos",
            Self::Slabs => "chapas",
            Self::Tiles => "ladrilhos",
        }
    }

    fn cli_name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Movements => "movements",
            Self::Locations => "locations",
            Self::Profiles => "profiles",
            Self::AuditLog => "audit-log",
            Self::Blocks => "blocks",
            Self::Slabs => "slabs",
            Self::Tiles => "tiles",
        }
    }

    /// Column list views sort by.
    pub fn default_order(self) -> (&'static str, bool) {
        match self {
            Self::Movements | Self::AuditLog => ("created_at", false),
            Self::Products | Self::Locations | Self::Profiles => ("nome", true),
            Self::Blocks | Self::Slabs | Self::Tiles => ("codigo", true),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown resource: {0}")]
pub struct UnknownResource(pub String);

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|r| r.cli_name() == needle || r.table_name().replace('_', "-") == needle)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("produtos", Resource::Products)]
    #[case("products", Resource::Products)]
    #[case("PRODUCTS", Resource::Products)]
    #[case("audit_log", Resource::AuditLog)]
    #[case("audit-log", Resource::AuditLog)]
    #[case("chapas", Resource::Slabs)]
    #[case("tiles", Resource::Tiles)]
    fn parses_table_and_cli_names(#[case] input: &str, #[case] expected: Resource) {
        assert_eq!(input.parse::<Resource>().unwrap(), expected);
    }

    #[test]
    fn unknown_name_returns_error() {
        assert_eq!(
            "pedidos".parse::<Resource>(),
            Err(UnknownResource("pedidos".to_string()))
        );
    }

    #[test]
    fn table_names_are_unique() {
        let mut names: Vec<_> = Resource::ALL.iter().map(|r| r.table_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Resource::ALL.len());
    }
}
