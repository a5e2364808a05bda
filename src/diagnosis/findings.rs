//! Diagnosis categories, conditions and grouped findings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnosis category, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Disease,
    MacroNutrient,
    SecondaryNutrient,
    MicroNutrient,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Disease,
        Category::MacroNutrient,
        Category::SecondaryNutrient,
        Category::MicroNutrient,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Category::Disease => "Disease",
            Category::MacroNutrient => "Macro-nutrients (NPK)",
            Category::SecondaryNutrient => "Secondary nutrients",
            Category::MicroNutrient => "Micronutrients",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Every condition the rule table can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    LeafBlight,
    PowderyMildew,
    LeafSpot,
    NitrogenDeficiency,
    PhosphorusDeficiency,
    PotassiumDeficiency,
    CalciumDeficiency,
    MagnesiumDeficiency,
    SulfurDeficiency,
    IronDeficiency,
    ZincDeficiency,
    CopperDeficiency,
}

impl Condition {
    pub fn name(&self) -> &'static str {
        match self {
            Condition::LeafBlight => "Leaf blight",
            Condition::PowderyMildew => "Powdery mildew",
            Condition::LeafSpot => "Leaf spot/rot",
            Condition::NitrogenDeficiency => "Nitrogen (N) deficiency",
            Condition::PhosphorusDeficiency => "Phosphorus (P) deficiency",
            Condition::PotassiumDeficiency => "Potassium (K) deficiency",
            Condition::CalciumDeficiency => "Calcium (Ca) deficiency",
            Condition::MagnesiumDeficiency => "Magnesium (Mg) deficiency",
            Condition::SulfurDeficiency => "Sulfur (S) deficiency",
            Condition::IronDeficiency => "Iron (Fe) deficiency",
            Condition::ZincDeficiency => "Zinc (Zn) deficiency",
            Condition::CopperDeficiency => "Copper (Cu) deficiency",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Condition::LeafBlight => "Brown spots on the leaf from fungal infection",
            Condition::PowderyMildew => "White or gray powdery coating from fungal growth",
            Condition::LeafSpot => "Dark brown to black spots on the leaf",
            Condition::NitrogenDeficiency => "Yellowing across the whole leaf",
            Condition::PhosphorusDeficiency => "Purple or reddish leaf coloring",
            Condition::PotassiumDeficiency => "Brown, scorched leaf margins",
            Condition::CalciumDeficiency => "Pale leaves or white spots",
            Condition::MagnesiumDeficiency => "Pale yellowing between the leaf veins",
            Condition::SulfurDeficiency => "Dark brown spots on the leaf",
            Condition::IronDeficiency => "Pale yellow chlorosis between the veins",
            Condition::ZincDeficiency => "Dark brown spots on the leaf",
            Condition::CopperDeficiency => "Brown and purple discoloration",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Condition::LeafBlight => "Apply a fungicide and remove infected leaves",
            Condition::PowderyMildew => "Apply a fungicide and reduce humidity",
            Condition::LeafSpot => "Remove infected leaves and apply a fungicide",
            Condition::NitrogenDeficiency => "Apply nitrogen fertilizer such as urea",
            Condition::PhosphorusDeficiency => "Apply phosphate fertilizer",
            Condition::PotassiumDeficiency => {
                "Apply potassium fertilizer such as potassium chloride"
            }
            Condition::CalciumDeficiency => "Apply agricultural lime or calcium nitrate",
            Condition::MagnesiumDeficiency => "Apply magnesium sulfate",
            Condition::SulfurDeficiency => "Apply a sulfur-containing fertilizer",
            Condition::IronDeficiency => "Apply chelated iron",
            Condition::ZincDeficiency => "Apply zinc sulfate",
            Condition::CopperDeficiency => "Apply copper sulfate",
        }
    }

    pub fn finding(&self) -> Finding {
        Finding {
            condition: *self,
            name: self.name().to_string(),
            description: self.description().to_string(),
            recommendation: self.recommendation().to_string(),
        }
    }
}

/// One reported condition with its symptom description and remedy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub condition: Condition,
    pub name: String,
    pub description: String,
    pub recommendation: String,
}

/// Findings grouped by category
///
/// A category's list is empty when none of its rules fired.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagnoses {
    pub disease: Vec<Finding>,
    pub macro_nutrient: Vec<Finding>,
    pub secondary_nutrient: Vec<Finding>,
    pub micro_nutrient: Vec<Finding>,
}

impl Diagnoses {
    pub fn get(&self, category: Category) -> &[Finding] {
        match category {
            Category::Disease => &self.disease,
            Category::MacroNutrient => &self.macro_nutrient,
            Category::SecondaryNutrient => &self.secondary_nutrient,
            Category::MicroNutrient => &self.micro_nutrient,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<Finding> {
        match category {
            Category::Disease => &mut self.disease,
            Category::MacroNutrient => &mut self.macro_nutrient,
            Category::SecondaryNutrient => &mut self.secondary_nutrient,
            Category::MicroNutrient => &mut self.micro_nutrient,
        }
    }

    /// Add a condition to a category unless it is already listed there
    pub fn add(&mut self, category: Category, condition: Condition) -> bool {
        let list = self.get_mut(category);
        if list.iter().any(|f| f.condition == condition) {
            return false;
        }
        list.push(condition.finding());
        true
    }

    /// Whether `condition` is listed under `category`
    pub fn contains(&self, category: Category, condition: Condition) -> bool {
        self.get(category).iter().any(|f| f.condition == condition)
    }

    /// Whether `condition` is listed under any category
    pub fn contains_anywhere(&self, condition: Condition) -> bool {
        Category::ALL.iter().any(|c| self.contains(*c, condition))
    }

    /// True when no rule fired in any category
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c).is_empty())
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    /// `(category, findings)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Finding])> + '_ {
        Category::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    /// Single-line rendering, e.g. `Disease: Leaf blight | Micronutrients: Copper (Cu) deficiency`
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .iter()
            .filter(|(_, findings)| !findings.is_empty())
            .map(|(category, findings)| {
                let names: Vec<&str> = findings.iter().map(|f| f.name.as_str()).collect();
                format!("{}: {}", category.title(), names.join("; "))
            })
            .collect();

        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_deduplicates_within_category() {
        let mut d = Diagnoses::default();
        assert!(d.add(Category::SecondaryNutrient, Condition::CalciumDeficiency));
        assert!(!d.add(Category::SecondaryNutrient, Condition::CalciumDeficiency));
        assert_eq!(d.secondary_nutrient.len(), 1);
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_empty_summary() {
        let d = Diagnoses::default();
        assert!(d.is_empty());
        assert_eq!(d.summary(), "none");
    }

    #[test]
    fn test_summary_lists_nonempty_categories() {
        let mut d = Diagnoses::default();
        d.add(Category::Disease, Condition::LeafBlight);
        d.add(Category::MicroNutrient, Condition::CopperDeficiency);
        d.add(Category::MicroNutrient, Condition::ZincDeficiency);
        assert_eq!(
            d.summary(),
            "Disease: Leaf blight | Micronutrients: Copper (Cu) deficiency; Zinc (Zn) deficiency"
        );
    }

    #[test]
    fn test_finding_carries_text() {
        let f = Condition::IronDeficiency.finding();
        assert_eq!(f.name, "Iron (Fe) deficiency");
        assert_eq!(f.recommendation, "Apply chelated iron");
    }
}
