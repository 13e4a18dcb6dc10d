use super::{UnitError, UnitLibrary, normalize_operator};

/// Displays units as written and names combined units after the operation,
/// e.g. `m*s` or `m/s`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleUnitLibrary;

impl UnitLibrary for SimpleUnitLibrary {
    fn display_name(&mut self, unit: &str) -> Result<String, UnitError> {
        Ok(unit.to_string())
    }

    fn combine(
        &mut self,
        left: &str,
        right: &str,
        operator: &str,
        _order_matters: bool,
    ) -> Result<String, UnitError> {
        Ok(format!("{}{}{}", left, normalize_operator(operator), right))
    }
}
