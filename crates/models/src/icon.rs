use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::ModelError;

/// Icons the admin form offers. Exactly one is chosen per service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceIcon {
    Code,
    Globe,
    Smartphone,
    ShoppingCart,
    Search,
    PenTool,
    Server,
    Shield,
    BarChart,
    Cloud,
    Database,
    Megaphone,
}

impl ServiceIcon {
    pub const ALL: [ServiceIcon; 12] = [
        ServiceIcon::Code,
        ServiceIcon::Globe,
        ServiceIcon::Smartphone,
        ServiceIcon::ShoppingCart,
        ServiceIcon::Search,
        ServiceIcon::PenTool,
        ServiceIcon::Server,
        ServiceIcon::Shield,
        ServiceIcon::BarChart,
        ServiceIcon::Cloud,
        ServiceIcon::Database,
        ServiceIcon::Megaphone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceIcon::Code => "code",
            ServiceIcon::Globe => "globe",
            ServiceIcon::Smartphone => "smartphone",
            ServiceIcon::ShoppingCart => "shopping-cart",
            ServiceIcon::Search => "search",
            ServiceIcon::PenTool => "pen-tool",
            ServiceIcon::Server => "server",
            ServiceIcon::Shield => "shield",
            ServiceIcon::BarChart => "bar-chart",
            ServiceIcon::Cloud => "cloud",
            ServiceIcon::Database => "database",
            ServiceIcon::Megaphone => "megaphone",
        }
    }

    /// Human label for the picker.
    pub fn label(self) -> &'static str {
        match self {
            ServiceIcon::Code => "Code",
            ServiceIcon::Globe => "Globe",
            ServiceIcon::Smartphone => "Smartphone",
            ServiceIcon::ShoppingCart => "Shopping Cart",
            ServiceIcon::Search => "Search",
            ServiceIcon::PenTool => "Pen Tool",
            ServiceIcon::Server => "Server",
            ServiceIcon::Shield => "Shield",
            ServiceIcon::BarChart => "Bar Chart",
            ServiceIcon::Cloud => "Cloud",
            ServiceIcon::Database => "Database",
            ServiceIcon::Megaphone => "Megaphone",
        }
    }
}

impl fmt::Display for ServiceIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceIcon {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ServiceIcon::ALL
            .into_iter()
            .find(|icon| icon.as_str() == wanted)
            .ok_or_else(|| ModelError::UnknownIcon(s.to_string()))
    }
}

/// Unknown or missing icon names read as `None` instead of failing the record.
pub fn lenient<'de, D>(d: D) -> Result<Option<ServiceIcon>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}
