//! Clause assembly templates.
//!
//! A [`Specification`] describes how a clause's final text is produced from
//! its already-computed parts: either one flat template, or a table of
//! templates selected by how many parts the clause actually has. Tables also
//! support repeated positional groups (a variable number of JOINs, say)
//! joined by a declared separator, where each repetition picks its own
//! sub-template by arity.

use std::collections::HashMap;

use crate::error::{Result, SqlError};
use crate::interpolate::{interpolate, placeholder_count};

/// A template, or an arity-keyed table of templates, for one clause.
#[derive(Debug, Clone)]
pub enum Specification {
    /// One positional template; parameter count must match exactly.
    Flat(String),
    /// Templates selected by parameter count.
    Table(SpecificationTable),
}

impl Specification {
    /// A flat template.
    pub fn flat(template: impl Into<String>) -> Self {
        Self::Flat(template.into())
    }

    /// A template table; validates every variant at construction.
    pub fn table(variants: Vec<TemplateVariant>) -> Result<Self> {
        for variant in &variants {
            variant.validate()?;
        }
        Ok(Self::Table(SpecificationTable { variants }))
    }
}

/// The table form: one variant per supported parameter count.
#[derive(Debug, Clone)]
pub struct SpecificationTable {
    variants: Vec<TemplateVariant>,
}

/// One outer template plus the per-position handling of its parameters.
#[derive(Debug, Clone)]
pub struct TemplateVariant {
    template: String,
    positions: Vec<Option<PositionSpec>>,
}

impl TemplateVariant {
    /// Creates a variant; `positions` aligns with the template's positions.
    ///
    /// `None` means the parameter arrives as a finished string.
    pub fn new(template: impl Into<String>, positions: Vec<Option<PositionSpec>>) -> Self {
        Self {
            template: template.into(),
            positions,
        }
    }

    fn validate(&self) -> Result<()> {
        let declared = placeholder_count(&self.template);
        if declared != self.positions.len() {
            return Err(SqlError::InvalidArgument(format!(
                "template '{}' declares {declared} position(s) but {} were specified",
                self.template,
                self.positions.len()
            )));
        }
        for spec in self.positions.iter().flatten() {
            for (arity, sub) in &spec.templates {
                let sub_declared = placeholder_count(sub);
                if sub_declared != *arity {
                    return Err(SqlError::InvalidArgument(format!(
                        "sub-template '{sub}' keyed by arity {arity} declares {sub_declared} position(s)"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Arity-keyed sub-templates for one template position.
#[derive(Debug, Clone, Default)]
pub struct PositionSpec {
    templates: HashMap<usize, String>,
    combined_by: Option<String>,
}

impl PositionSpec {
    /// A position whose value is a single arity-dispatched group.
    #[must_use]
    pub fn dispatch() -> Self {
        Self::default()
    }

    /// A position holding repeated groups joined by `separator`.
    pub fn combined(separator: impl Into<String>) -> Self {
        Self {
            templates: HashMap::new(),
            combined_by: Some(separator.into()),
        }
    }

    /// Registers the sub-template used when a group has `arity` members.
    #[must_use]
    pub fn with(mut self, arity: usize, template: impl Into<String>) -> Self {
        self.templates.insert(arity, template.into());
        self
    }
}

/// A per-position parameter handed to [`resolve`].
#[derive(Debug, Clone)]
pub enum ParamValue {
    /// A finished string, substituted as-is.
    Sql(String),
    /// A group of strings whose count selects a sub-template.
    List(Vec<String>),
    /// Repeated groups for a combined position; each group's own count
    /// selects its sub-template.
    Groups(Vec<Vec<String>>),
}

impl ParamValue {
    /// Convenience for the common finished-string case.
    pub fn sql(text: impl Into<String>) -> Self {
        Self::Sql(text.into())
    }
}

/// Produces a clause's final text from its specification and parameters.
pub fn resolve(spec: &Specification, parameters: &[ParamValue]) -> Result<String> {
    match spec {
        Specification::Flat(template) => {
            let values = parameters
                .iter()
                .map(|p| match p {
                    ParamValue::Sql(s) => Ok(s.clone()),
                    ParamValue::List(_) | ParamValue::Groups(_) => Err(SqlError::InvalidArgument(
                        String::from("a flat specification expects finished strings"),
                    )),
                })
                .collect::<Result<Vec<_>>>()?;
            interpolate(template, &values)
        }
        Specification::Table(table) => resolve_table(table, parameters),
    }
}

fn resolve_table(table: &SpecificationTable, parameters: &[ParamValue]) -> Result<String> {
    let variant = table
        .variants
        .iter()
        .find(|v| v.positions.len() == parameters.len())
        .ok_or(SqlError::UnsupportedArity(parameters.len()))?;

    let mut top = Vec::with_capacity(parameters.len());
    for (position, parameter) in parameters.iter().enumerate() {
        let resolved = match (&variant.positions[position], parameter) {
            (None, ParamValue::Sql(s)) => s.clone(),
            (None, _) => {
                return Err(SqlError::InvalidArgument(format!(
                    "position {position} expects a finished string"
                )));
            }
            (Some(spec), value) => resolve_position(spec, value, position)?,
        };
        top.push(resolved);
    }
    interpolate(&variant.template, &top)
}

fn resolve_position(spec: &PositionSpec, value: &ParamValue, position: usize) -> Result<String> {
    match (&spec.combined_by, value) {
        (Some(separator), ParamValue::Groups(groups)) => {
            let mut rendered = Vec::with_capacity(groups.len());
            for group in groups {
                rendered.push(render_group(spec, group)?);
            }
            Ok(rendered.join(separator))
        }
        (None, ParamValue::List(group)) => render_group(spec, group),
        _ => Err(SqlError::InvalidArgument(format!(
            "position {position} received a value of the wrong shape"
        ))),
    }
}

fn render_group(spec: &PositionSpec, group: &[String]) -> Result<String> {
    let template = spec
        .templates
        .get(&group.len())
        .ok_or(SqlError::UnsupportedArity(group.len()))?;
    interpolate(template, group)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn flat_resolution() {
        let spec = Specification::flat("WHERE %1$s");
        let sql = resolve(&spec, &[ParamValue::sql("a = b")]).unwrap();
        assert_eq!(sql, "WHERE a = b");
    }

    #[test]
    fn flat_rejects_structured_parameters() {
        let spec = Specification::flat("WHERE %1$s");
        assert!(matches!(
            resolve(&spec, &[ParamValue::List(strs(&["a"]))]),
            Err(SqlError::InvalidArgument(_))
        ));
        assert!(matches!(
            resolve(&spec, &[ParamValue::Groups(vec![strs(&["a"])])]),
            Err(SqlError::InvalidArgument(_))
        ));
    }

    #[test]
    fn arity_selects_the_matching_variant() {
        let spec = Specification::table(vec![
            TemplateVariant::new("%1$s", vec![None]),
            TemplateVariant::new("%1$s OFFSET %2$s", vec![None, None]),
        ])
        .unwrap();

        assert_eq!(
            resolve(&spec, &[ParamValue::sql("LIMIT 10")]).unwrap(),
            "LIMIT 10"
        );
        assert_eq!(
            resolve(
                &spec,
                &[ParamValue::sql("LIMIT 10"), ParamValue::sql("20")]
            )
            .unwrap(),
            "LIMIT 10 OFFSET 20"
        );
        assert!(matches!(
            resolve(
                &spec,
                &[
                    ParamValue::sql("a"),
                    ParamValue::sql("b"),
                    ParamValue::sql("c")
                ]
            ),
            Err(SqlError::UnsupportedArity(3))
        ));
    }

    #[test]
    fn combined_groups_join_with_separator() {
        let spec = Specification::table(vec![TemplateVariant::new(
            "%1$s",
            vec![Some(
                PositionSpec::combined(" ").with(3, "%1$s JOIN %2$s ON %3$s"),
            )],
        )])
        .unwrap();

        let joins = ParamValue::Groups(vec![
            strs(&["INNER", "orders", "o.id = u.id"]),
            strs(&["LEFT", "items", "i.id = o.id"]),
        ]);
        assert_eq!(
            resolve(&spec, &[joins]).unwrap(),
            "INNER JOIN orders ON o.id = u.id LEFT JOIN items ON i.id = o.id"
        );
    }

    #[test]
    fn empty_group_list_degrades_to_empty_text() {
        let spec = Specification::table(vec![TemplateVariant::new(
            "%1$s",
            vec![Some(
                PositionSpec::combined(" ").with(3, "%1$s JOIN %2$s ON %3$s"),
            )],
        )])
        .unwrap();
        assert_eq!(
            resolve(&spec, &[ParamValue::Groups(vec![])]).unwrap(),
            ""
        );
    }

    #[test]
    fn group_with_unsupported_arity_fails() {
        let spec = Specification::table(vec![TemplateVariant::new(
            "%1$s",
            vec![Some(
                PositionSpec::combined(" ").with(3, "%1$s JOIN %2$s ON %3$s"),
            )],
        )])
        .unwrap();
        let joins = ParamValue::Groups(vec![strs(&["INNER", "orders"])]);
        assert!(matches!(
            resolve(&spec, &[joins]),
            Err(SqlError::UnsupportedArity(2))
        ));
    }

    #[test]
    fn construction_rejects_inconsistent_templates() {
        assert!(Specification::table(vec![TemplateVariant::new(
            "%1$s %2$s",
            vec![None]
        )])
        .is_err());
        assert!(Specification::table(vec![TemplateVariant::new(
            "%1$s",
            vec![Some(PositionSpec::dispatch().with(2, "%1$s"))]
        )])
        .is_err());
    }
}
