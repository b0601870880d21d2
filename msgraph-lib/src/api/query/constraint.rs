//! Single OData comparison constraints.

use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Comparison operator of a [`Constraint`].
///
/// Every operator owns a fixed render template, see [`Operator::template`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `{attribute} eq {value}`
    Eq,
    /// `{attribute} ne {value}`
    Ne,
    /// `{attribute} lt {value}`
    Lt,
    /// `{attribute} gt {value}`
    Gt,
    /// `{attribute} le {value}`
    Le,
    /// `{attribute} ge {value}`
    Ge,
    /// `startswith({attribute}, '{value}')`
    StartsWith,
    /// `endswith({attribute}, '{value}')`
    EndsWith,
    /// `{attribute}/any(f:f/{inner_attribute} eq '{value}')`
    AnyEq,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 9] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Gt,
        Operator::Le,
        Operator::Ge,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::AnyEq,
    ];

    /// Returns the render template of this operator.
    pub fn template(self) -> &'static str {
        match self {
            Operator::Eq => "{attribute} eq {value}",
            Operator::Ne => "{attribute} ne {value}",
            Operator::Lt => "{attribute} lt {value}",
            Operator::Gt => "{attribute} gt {value}",
            Operator::Le => "{attribute} le {value}",
            Operator::Ge => "{attribute} ge {value}",
            Operator::StartsWith => "startswith({attribute}, '{value}')",
            Operator::EndsWith => "endswith({attribute}, '{value}')",
            Operator::AnyEq => "{attribute}/any(f:f/{inner_attribute} eq '{value}')",
        }
    }

    /// Returns the name of this operator.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Gt => "gt",
            Operator::Le => "le",
            Operator::Ge => "ge",
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
            Operator::AnyEq => "any_eq",
        }
    }

    /// Returns `true` if the operator needs an inner attribute.
    pub fn requires_inner_attribute(self) -> bool {
        matches!(self, Operator::AnyEq)
    }

    fn render(self, attribute: &str, value: &str, inner_attribute: &str) -> String {
        match self {
            Operator::Eq => format!("{} eq {}", attribute, value),
            Operator::Ne => format!("{} ne {}", attribute, value),
            Operator::Lt => format!("{} lt {}", attribute, value),
            Operator::Gt => format!("{} gt {}", attribute, value),
            Operator::Le => format!("{} le {}", attribute, value),
            Operator::Ge => format!("{} ge {}", attribute, value),
            Operator::StartsWith => format!("startswith({}, '{}')", attribute, value),
            Operator::EndsWith => format!("endswith({}, '{}')", attribute, value),
            Operator::AnyEq => {
                format!("{}/any(f:f/{} eq '{}')", attribute, inner_attribute, value)
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    /// Parses an operator name, case-insensitively (`"ne"`, `"STARTS_WITH"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Ok(Operator::Eq),
            "ne" => Ok(Operator::Ne),
            "lt" => Ok(Operator::Lt),
            "gt" => Ok(Operator::Gt),
            "le" => Ok(Operator::Le),
            "ge" => Ok(Operator::Ge),
            "startswith" | "starts_with" => Ok(Operator::StartsWith),
            "endswith" | "ends_with" => Ok(Operator::EndsWith),
            "any_eq" | "anyeq" => Ok(Operator::AnyEq),
            _ => Err(QueryError::UnknownOperator(s.to_string())),
        }
    }
}

/// A single comparison such as `city ne New-York`.
///
/// Values are substituted verbatim: comparison operators render the value as
/// given (quote string literals yourself), the string functions and `any_eq`
/// wrap it in single quotes.
///
/// # Example
///
/// ```
/// use msgraph_lib::api::query::{Constraint, Operator};
///
/// let c = Constraint::new("city", Operator::Ne, "New-York").unwrap();
/// assert_eq!(c.to_string(), "city ne New-York");
///
/// let c = Constraint::any_eq("assignedLicenses", "skuId", "c7df2760").unwrap();
/// assert_eq!(c.to_string(), "assignedLicenses/any(f:f/skuId eq 'c7df2760')");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    attribute: String,
    operator: Operator,
    value: String,
    inner_attribute: Option<String>,
}

impl Constraint {
    /// Creates a constraint for any operator except [`Operator::AnyEq`].
    pub fn new(
        attribute: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
    ) -> Result<Self, QueryError> {
        Self::with_inner_attribute(attribute, operator, value, None::<String>)
    }

    /// Creates a collection filter: `{attribute}/any(f:f/{inner_attribute} eq '{value}')`.
    pub fn any_eq(
        attribute: impl Into<String>,
        inner_attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, QueryError> {
        Self::with_inner_attribute(attribute, Operator::AnyEq, value, Some(inner_attribute))
    }

    /// Creates a constraint, validating every part.
    ///
    /// `inner_attribute` must be present for [`Operator::AnyEq`] and absent for
    /// every other operator.
    pub fn with_inner_attribute(
        attribute: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
        inner_attribute: Option<impl Into<String>>,
    ) -> Result<Self, QueryError> {
        let attribute = attribute.into();
        let value = value.into();
        let inner_attribute: Option<String> = inner_attribute.map(Into::into);

        if attribute.is_empty() {
            return Err(QueryError::Empty { what: "attribute" });
        }
        if value.is_empty() {
            return Err(QueryError::Empty { what: "value" });
        }

        match (operator.requires_inner_attribute(), &inner_attribute) {
            (true, None) => {
                return Err(QueryError::MissingInnerAttribute {
                    operator: operator.name(),
                });
            }
            (true, Some(inner)) if inner.is_empty() => {
                return Err(QueryError::Empty {
                    what: "inner attribute",
                });
            }
            (false, Some(_)) => {
                return Err(QueryError::UnexpectedInnerAttribute {
                    operator: operator.name(),
                });
            }
            _ => {}
        }

        Ok(Self {
            attribute,
            operator,
            value,
            inner_attribute,
        })
    }

    /// Returns the attribute being compared.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns the operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the comparison value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the inner attribute of an `any_eq` constraint.
    pub fn inner_attribute(&self) -> Option<&str> {
        self.inner_attribute.as_deref()
    }

    /// Renders the constraint with its operator template.
    pub fn render(&self) -> String {
        self.operator.render(
            &self.attribute,
            &self.value,
            self.inner_attribute.as_deref().unwrap_or_default(),
        )
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_operators() {
        let c = Constraint::new("city", Operator::Ne, "New-York").unwrap();
        assert_eq!(c.render(), "city ne New-York");

        let c = Constraint::new("displayName", Operator::Eq, "'Noam'").unwrap();
        assert_eq!(c.render(), "displayName eq 'Noam'");

        let c = Constraint::new("age", Operator::Ge, "21").unwrap();
        assert_eq!(c.render(), "age ge 21");
    }

    #[test]
    fn test_string_functions() {
        let c = Constraint::new("subject", Operator::StartsWith, "Trip").unwrap();
        assert_eq!(c.render(), "startswith(subject, 'Trip')");

        let c = Constraint::new("mail", Operator::EndsWith, "@contoso.com").unwrap();
        assert_eq!(c.render(), "endswith(mail, '@contoso.com')");
    }

    #[test]
    fn test_any_eq() {
        let c = Constraint::any_eq("proxyAddresses", "address", "smtp:a@b.com").unwrap();
        assert_eq!(c.render(), "proxyAddresses/any(f:f/address eq 'smtp:a@b.com')");
        assert_eq!(c.inner_attribute(), Some("address"));
    }

    #[test]
    fn test_any_eq_requires_inner_attribute() {
        let err = Constraint::new("proxyAddresses", Operator::AnyEq, "x").unwrap_err();
        assert_eq!(err, QueryError::MissingInnerAttribute { operator: "any_eq" });

        let err = Constraint::any_eq("proxyAddresses", "", "x").unwrap_err();
        assert_eq!(err, QueryError::Empty { what: "inner attribute" });
    }

    #[test]
    fn test_inner_attribute_rejected_for_comparisons() {
        let err =
            Constraint::with_inner_attribute("city", Operator::Eq, "x", Some("y")).unwrap_err();
        assert_eq!(err, QueryError::UnexpectedInnerAttribute { operator: "eq" });
    }

    #[test]
    fn test_empty_parts_rejected() {
        assert_eq!(
            Constraint::new("", Operator::Eq, "x").unwrap_err(),
            QueryError::Empty { what: "attribute" }
        );
        assert_eq!(
            Constraint::new("city", Operator::Eq, "").unwrap_err(),
            QueryError::Empty { what: "value" }
        );
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("NE".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!("starts_with".parse::<Operator>().unwrap(), Operator::StartsWith);
        assert_eq!("ANY_EQ".parse::<Operator>().unwrap(), Operator::AnyEq);
        assert_eq!(
            "contains".parse::<Operator>().unwrap_err(),
            QueryError::UnknownOperator("contains".to_string())
        );
    }

    #[test]
    fn test_templates_match_rendering() {
        for op in Operator::ALL {
            let inner = op.requires_inner_attribute().then_some("inner");
            let c = Constraint::with_inner_attribute("attr", op, "val", inner).unwrap();
            let expected = op
                .template()
                .replace("{attribute}", "attr")
                .replace("{inner_attribute}", "inner")
                .replace("{value}", "val");
            assert_eq!(c.render(), expected, "operator {}", op);
        }
    }
}
