use crate::genomics::GeneticConfig;
use crate::Innovation;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Genes are the principal components of genomes.
/// They are created between two nodes, and become
/// network connections in the genome's phenotype.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Gene {
    id: Innovation,
    input: Innovation,
    output: Innovation,
    weight: f64,
    suppressed: bool,
}

impl Gene {
    /// Returns a new _unsuppressed_ gene with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    /// ```
    pub fn new(id: Innovation, input: Innovation, output: Innovation, weight: f64) -> Gene {
        Gene {
            id,
            input,
            output,
            weight,
            suppressed: false,
        }
    }

    /// Returns a random weight. Uses a uniform distribution
    /// over the range ±config.weight_bound.
    pub(super) fn random_weight(config: &GeneticConfig, rng: &mut impl Rng) -> f64 {
        if config.weight_bound > 0.0 {
            rng.gen_range(-config.weight_bound..=config.weight_bound)
        } else {
            0.0
        }
    }

    /// Returns the gene's innovation number.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.innovation(), 42);
    /// ```
    pub fn innovation(&self) -> Innovation {
        self.id
    }

    /// Returns the gene's input node's innovation number.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.input(), 3);
    /// ```
    pub fn input(&self) -> Innovation {
        self.input
    }

    /// Returns the gene's output node's innovation number.
    pub fn output(&self) -> Innovation {
        self.output
    }

    /// Returns the gene's weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Sets the gene's weight
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::Gene;
    ///
    /// let mut gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.weight(), 2.0);
    ///
    /// gene.set_weight(-5.0);
    ///
    /// assert_eq!(gene.weight(), -5.0);
    /// ```
    pub fn set_weight(&mut self, w: f64) {
        self.weight = w;
    }

    /// Returns the gene's suppression status. Suppressed
    /// genes are not expressed in the genome's phenotype.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.suppressed(), false);
    /// ```
    pub fn suppressed(&self) -> bool {
        self.suppressed
    }

    /// Sets the gene's suppression status.
    pub fn set_suppressed(&mut self, suppression: bool) {
        self.suppressed = suppression;
    }

    /// Returns the gene's input and output's innovation numbers.
    pub fn endpoints(&self) -> (Innovation, Innovation) {
        (self.input, self.output)
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:?}[{:?}->{:?}, {:.3}]{}",
            if self.suppressed { "(" } else { "" },
            self.id,
            self.input,
            self.output,
            self.weight,
            if self.suppressed { ")" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_weight_within_bound() {
        let config = GeneticConfig {
            weight_bound: 5.0,
            ..GeneticConfig::zero()
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(Gene::random_weight(&config, &mut rng).abs() <= 5.0);
        }
    }

    #[test]
    fn random_weight_zero_bound() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(Gene::random_weight(&GeneticConfig::zero(), &mut rng), 0.0);
    }

    #[test]
    fn display_suppressed() {
        let mut gene = Gene::new(3, 1, 2, 0.5);
        assert_eq!(gene.to_string(), "3[1->2, 0.500]");
        gene.set_suppressed(true);
        assert_eq!(gene.to_string(), "(3[1->2, 0.500])");
    }
}
