//! Shared builders for integration tests.

use fundmatch::{
    Company, EligibilityCriteria, Embedding, Incentive, SizeClass, SizeRequirement,
};

pub const TEST_DIM: usize = 8;

pub fn test_embedding(seed: u64) -> Embedding {
    let vector: Vec<f32> = (0..TEST_DIM)
        .map(|i| {
            let mixed = (seed.wrapping_mul(31).wrapping_add(i as u64)) % 1000;
            mixed as f32 / 1000.0 + 0.001
        })
        .collect();
    Embedding::from_f32(&vector, TEST_DIM).expect("fixture embedding is well-formed")
}

pub fn aligned_embedding(direction: &[f32; TEST_DIM]) -> Embedding {
    Embedding::from_f32(direction, TEST_DIM).expect("fixture embedding is well-formed")
}

pub struct IncentiveBuilder {
    incentive: Incentive,
}

impl IncentiveBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            incentive: Incentive {
                incentive_id: id.to_string(),
                title: "Apoio à transição energética".to_string(),
                description: Some("Financiamento para energia renovável".to_string()),
                criteria: EligibilityCriteria::default(),
                total_budget: None,
                embedding: None,
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.incentive.title = title.to_string();
        self
    }

    pub fn sizes(mut self, sizes: &[SizeClass]) -> Self {
        self.incentive.criteria.size_classes =
            sizes.iter().map(|s| SizeRequirement::Class(*s)).collect();
        self
    }

    pub fn sectors(mut self, codes: &[&str]) -> Self {
        self.incentive.criteria.sector_codes = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.incentive.criteria.location = Some(location.to_string());
        self
    }

    pub fn embedding(mut self, embedding: Embedding) -> Self {
        self.incentive.embedding = Some(embedding);
        self
    }

    pub fn build(self) -> Incentive {
        self.incentive
    }
}

pub struct CompanyBuilder {
    company: Company,
}

impl CompanyBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            company: Company {
                company_id: id.to_string(),
                name: name.to_string(),
                sector_codes: vec![],
                size: SizeClass::Unknown,
                district: None,
                description: None,
                embedding: None,
            },
        }
    }

    pub fn size(mut self, size: SizeClass) -> Self {
        self.company.size = size;
        self
    }

    pub fn sectors(mut self, codes: &[&str]) -> Self {
        self.company.sector_codes = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn district(mut self, district: &str) -> Self {
        self.company.district = Some(district.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.company.description = Some(description.to_string());
        self
    }

    pub fn embedding(mut self, embedding: Embedding) -> Self {
        self.company.embedding = Some(embedding);
        self
    }

    pub fn build(self) -> Company {
        self.company
    }
}
