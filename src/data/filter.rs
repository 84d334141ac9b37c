//! Record filtering by Location and Farming Method.

use crate::data::loader::string_values;
use crate::data::schema::{FARMING_METHOD, LOCATION};
use polars::prelude::*;
use std::collections::BTreeSet;

/// Allowed Locations / Farming Methods. An empty set means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub locations: BTreeSet<String>,
    pub methods: BTreeSet<String>,
}

impl RecordFilter {
    pub fn new<L, M>(locations: L, methods: M) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            locations: locations.into_iter().map(Into::into).collect(),
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.methods.is_empty()
    }

    /// Keep only the records matching every non-empty restriction.
    pub fn apply(&self, df: &DataFrame) -> PolarsResult<DataFrame> {
        if self.is_empty() {
            return Ok(df.clone());
        }

        let mut keep = vec![true; df.height()];
        Self::restrict(df, LOCATION, &self.locations, &mut keep)?;
        Self::restrict(df, FARMING_METHOD, &self.methods, &mut keep)?;

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        df.filter(&mask)
    }

    fn restrict(
        df: &DataFrame,
        column: &str,
        allowed: &BTreeSet<String>,
        keep: &mut [bool],
    ) -> PolarsResult<()> {
        if allowed.is_empty() {
            return Ok(());
        }
        let values = string_values(df, column)?;
        for (flag, value) in keep.iter_mut().zip(values) {
            *flag &= value.is_some_and(|v| allowed.contains(&v));
        }
        Ok(())
    }

    /// Human-readable summary, e.g. "Showing farmers in `Wote` using `All Methods` methods".
    pub fn summary(&self) -> String {
        let join = |set: &BTreeSet<String>, all: &str| {
            if set.is_empty() {
                all.to_string()
            } else {
                set.iter().cloned().collect::<Vec<_>>().join(", ")
            }
        };
        format!(
            "Showing farmers in `{}` using `{}` methods",
            join(&self.locations, "All Locations"),
            join(&self.methods, "All Methods")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            LOCATION => ["Wote", "Kibwezi", "Wote", "Mbooni"],
            FARMING_METHOD => ["Organic", "Conventional", "Conventional", "Organic"],
        )
        .unwrap()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = RecordFilter::default();
        assert_eq!(filter.apply(&sample()).unwrap().height(), 4);
    }

    #[test]
    fn filters_by_location() {
        let filter = RecordFilter::new(["Wote"], Vec::<String>::new());
        assert_eq!(filter.apply(&sample()).unwrap().height(), 2);
    }

    #[test]
    fn combines_location_and_method() {
        let filter = RecordFilter::new(["Wote", "Mbooni"], ["Organic"]);
        let out = filter.apply(&sample()).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(
            string_values(&out, LOCATION).unwrap(),
            vec![Some("Wote".to_string()), Some("Mbooni".to_string())]
        );
    }

    #[test]
    fn summary_names_selection() {
        assert_eq!(
            RecordFilter::default().summary(),
            "Showing farmers in `All Locations` using `All Methods` methods"
        );
        let filter = RecordFilter::new(["Wote", "Kibwezi"], ["Organic"]);
        assert_eq!(
            filter.summary(),
            "Showing farmers in `Kibwezi, Wote` using `Organic` methods"
        );
    }
}
