use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::pg_query_generator::Identifier;

use super::errors::TranslateError;

lazy_static! {
    /// Source-language function names (lowercased) and the SQL functions
    /// they translate to.
    static ref FUNCTION_NAMES: HashMap<&'static str, &'static str> = {
        let mut names = HashMap::new();

        names.insert("count", "count");
        names.insert("coalesce", "coalesce");
        names.insert("toupper", "upper");
        names.insert("tolower", "lower");

        names
    };
}

pub fn translate_function_name(name: &str) -> Result<Identifier, TranslateError> {
    FUNCTION_NAMES
        .get(name.to_lowercase().as_str())
        .map(|translated| Identifier::from(*translated))
        .ok_or_else(|| TranslateError::UnsupportedFunction(name.to_owned()))
}
