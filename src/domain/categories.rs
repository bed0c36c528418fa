//! User-editable category lists keyed by a fixed set of groups.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::core::errors::{BudgetError, Result};

/// Fixed group keys. Serialized under the labels the dashboard has always used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryGroup {
    #[serde(rename = "Receita")]
    Income,
    #[serde(rename = "Custos Fixos")]
    FixedCosts,
    #[serde(rename = "Custos Variáveis")]
    VariableCosts,
    #[serde(rename = "Metas")]
    Goals,
    #[serde(rename = "Lazer")]
    Leisure,
    #[serde(rename = "Educação")]
    Education,
    #[serde(rename = "Investimento")]
    Investment,
    #[serde(rename = "Banco")]
    Bank,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 8] = [
        CategoryGroup::Income,
        CategoryGroup::FixedCosts,
        CategoryGroup::VariableCosts,
        CategoryGroup::Goals,
        CategoryGroup::Leisure,
        CategoryGroup::Education,
        CategoryGroup::Investment,
        CategoryGroup::Bank,
    ];

    /// Groups an expense entry may be booked against.
    pub const EXPENSE: [CategoryGroup; 5] = [
        CategoryGroup::FixedCosts,
        CategoryGroup::VariableCosts,
        CategoryGroup::Goals,
        CategoryGroup::Leisure,
        CategoryGroup::Education,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CategoryGroup::Income => "Receita",
            CategoryGroup::FixedCosts => "Custos Fixos",
            CategoryGroup::VariableCosts => "Custos Variáveis",
            CategoryGroup::Goals => "Metas",
            CategoryGroup::Leisure => "Lazer",
            CategoryGroup::Education => "Educação",
            CategoryGroup::Investment => "Investimento",
            CategoryGroup::Bank => "Banco",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            CategoryGroup::Income => "income",
            CategoryGroup::FixedCosts => "fixed-costs",
            CategoryGroup::VariableCosts => "variable-costs",
            CategoryGroup::Goals => "goals",
            CategoryGroup::Leisure => "leisure",
            CategoryGroup::Education => "education",
            CategoryGroup::Investment => "investment",
            CategoryGroup::Bank => "bank",
        }
    }

    pub fn is_expense(&self) -> bool {
        Self::EXPENSE.contains(self)
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryGroup {
    type Err = BudgetError;

    fn from_str(value: &str) -> Result<Self> {
        let needle = value.trim();
        CategoryGroup::ALL
            .into_iter()
            .find(|group| {
                group.key().eq_ignore_ascii_case(needle) || group.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| BudgetError::validation(format!("unknown category group `{}`", needle)))
    }
}

/// Ordered label lists for every group; always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet {
    groups: BTreeMap<CategoryGroup, Vec<String>>,
}

impl Default for CategorySet {
    fn default() -> Self {
        let groups = CategoryGroup::ALL
            .into_iter()
            .map(|group| {
                let labels = default_labels(group).iter().map(|s| s.to_string()).collect();
                (group, labels)
            })
            .collect();
        Self { groups }
    }
}

impl CategorySet {
    /// Persisted lists win per group; groups absent from `persisted` keep their defaults.
    pub fn merged_over_defaults(persisted: BTreeMap<CategoryGroup, Vec<String>>) -> Self {
        let mut set = Self::default();
        for (group, labels) in persisted {
            set.groups.insert(group, clean_labels(labels));
        }
        set
    }

    pub fn labels(&self, group: CategoryGroup) -> &[String] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, group: CategoryGroup, label: &str) -> bool {
        self.labels(group).iter().any(|existing| existing == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryGroup, &[String])> {
        self.groups
            .iter()
            .map(|(group, labels)| (*group, labels.as_slice()))
    }

    /// Accounts configured under the bank group.
    pub fn accounts(&self) -> &[String] {
        self.labels(CategoryGroup::Bank)
    }

    pub fn add(&mut self, group: CategoryGroup, label: &str) -> Result<()> {
        let label = label.trim();
        if label.is_empty() {
            return Err(BudgetError::validation("category label cannot be blank"));
        }
        if self.contains(group, label) {
            return Err(BudgetError::validation(format!(
                "`{}` already exists in {}",
                label, group
            )));
        }
        self.groups.entry(group).or_default().push(label.to_string());
        Ok(())
    }

    /// Returns `false` when the label was not present.
    pub fn remove(&mut self, group: CategoryGroup, label: &str) -> bool {
        let label = label.trim();
        match self.groups.get_mut(&group) {
            Some(labels) => {
                let before = labels.len();
                labels.retain(|existing| existing != label);
                labels.len() != before
            }
            None => false,
        }
    }

    pub fn into_map(self) -> BTreeMap<CategoryGroup, Vec<String>> {
        self.groups
    }
}

fn clean_labels(labels: Vec<String>) -> Vec<String> {
    labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

fn default_labels(group: CategoryGroup) -> &'static [&'static str] {
    match group {
        CategoryGroup::Income => &[
            "Salário/Renda principal",
            "Freelancer/Serviços",
            "Bônus/Comissões",
            "Reembolsos",
            "Outros/Extras",
        ],
        CategoryGroup::FixedCosts => &[
            "Aluguel",
            "Condomínio",
            "Internet/Telefone",
            "Energia",
            "Água",
            "Transporte/Combustível",
            "Supermercado",
            "Mensalidades",
        ],
        CategoryGroup::VariableCosts => &[
            "Compras pessoais",
            "Cuidados pessoais",
            "Imprevistos",
            "Transporte/Veículo",
            "Alimentação fora",
        ],
        CategoryGroup::Goals => &["Reserva de Emergência", "Viagem", "Compras"],
        CategoryGroup::Leisure => &[
            "Restaurantes e bares",
            "Viagens e passeios",
            "Cinema, shows e eventos",
            "Hobbies",
        ],
        CategoryGroup::Education => &[
            "Curso online",
            "Livros e materiais",
            "Workshops e Eventos",
            "Mentoria",
            "Fundo de estudo",
        ],
        CategoryGroup::Investment => &[
            "Ações",
            "Renda Fixa",
            "Fundos Imobiliários",
            "Exterior",
            "Criptomoedas",
        ],
        CategoryGroup::Bank => &["Caixa", "Bradesco", "NuBank", "Banco do Brasil", "Dinheiro Vivo"],
    }
}
