//! Genomes are the focus of evolution in NEAT.
//! They are a collection of genes and nodes that can be
//! decoded into a phenotype (a neural network), either
//! directly or, for CPPN genomes, through a HyperNEAT substrate.

mod config;
mod errors;
mod genes;
mod nodes;

pub use config::GeneticConfig;
pub use errors::GenomeError;
pub use genes::Gene;
pub use nodes::{ActivationType, Node, NodeType};

use crate::Innovation;

use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::HashMap;
use std::collections::HashSet;
use std::fmt;

/// Innovation number of every genome's bias node.
pub const BIAS_ID: Innovation = 0;

/// A collection of genes and nodes.
///
/// Suports Serde for convenient genome saving and loading.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Genome {
    genes: HashMap<Innovation, Gene>,
    nodes: HashMap<Innovation, Node>,
    node_pairings: HashSet<(Innovation, Innovation)>,
}

impl Genome {
    /// Create a new genome with the specified configuration,
    /// using the thread-local RNG.
    ///
    /// Nodes are numbered in order: the bias node is 0, inputs
    /// follow from 1, then outputs, then hidden nodes. Initial
    /// genes connect the bias and inputs to every hidden node,
    /// and every hidden node to every output (or the bias and
    /// inputs straight to the outputs if there are no hidden
    /// nodes). Only a random [`initial_interconnection_proportion`]
    /// of each group is expressed, with at least one gene
    /// per group if the proportion is non-zero.
    ///
    /// Gene innovation numbers depend only on their endpoints,
    /// starting right after the last node's number, so all
    /// genomes created from one configuration agree on them.
    ///
    /// [`initial_interconnection_proportion`]: GeneticConfig::initial_interconnection_proportion
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::{GeneticConfig, Genome, NodeType};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     hidden_count: 4,
    ///     initial_interconnection_proportion: 1.0,
    ///     weight_bound: 5.0,
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// let genome = Genome::new(&config);
    ///
    /// // Bias + 3 inputs + 2 outputs + 4 hidden nodes.
    /// assert_eq!(genome.nodes().count(), 1 + 3 + 2 + 4);
    /// assert_eq!(genome.input_count(), 3);
    /// assert_eq!(genome.output_count(), 2);
    ///
    /// // Fully connected: (bias + inputs) -> hidden, hidden -> outputs.
    /// assert_eq!(genome.genes().count(), 4 * 4 + 4 * 2);
    ///
    /// // All genes should have weights within the established bound.
    /// assert!(genome.genes().all(|g| g.weight().abs() <= config.weight_bound));
    /// ```
    pub fn new(config: &GeneticConfig) -> Genome {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    /// Create a new genome with the specified configuration,
    /// drawing weights, activation functions and the expressed
    /// genes from `rng`. See [`Genome::new`].
    pub fn with_rng(config: &GeneticConfig, rng: &mut impl Rng) -> Genome {
        let mut genome = Genome {
            genes: HashMap::new(),
            nodes: Self::generate_nodes(config, rng),
            node_pairings: HashSet::new(),
        };
        genome.generate_initial_genes(config, rng);
        genome
    }

    fn generate_nodes(config: &GeneticConfig, rng: &mut impl Rng) -> HashMap<Innovation, Node> {
        let input_count = config.input_count.get();
        let output_count = config.output_count.get();
        let hidden_count = config.hidden_count;

        let mut nodes = HashMap::with_capacity(1 + input_count + output_count + hidden_count);

        nodes.insert(
            BIAS_ID,
            Node::new(BIAS_ID, NodeType::Bias, ActivationType::Identity),
        );
        for i in 1..=input_count {
            nodes.insert(i, Node::new(i, NodeType::Input, ActivationType::Identity));
        }
        for o in 0..output_count {
            let id = 1 + input_count + o;
            let activation_type = *config
                .output_activation_types
                .get(o)
                .unwrap_or(&ActivationType::Sigmoid);
            nodes.insert(id, Node::new(id, NodeType::Output, activation_type));
        }
        for h in 0..hidden_count {
            let id = 1 + input_count + output_count + h;
            let activation_type = *config
                .activation_types
                .choose(rng)
                .unwrap_or(&ActivationType::Sigmoid);
            nodes.insert(id, Node::new(id, NodeType::Hidden, activation_type));
        }

        nodes
    }

    fn generate_initial_genes(&mut self, config: &GeneticConfig, rng: &mut impl Rng) {
        let input_count = config.input_count.get();
        let output_count = config.output_count.get();
        let hidden_count = config.hidden_count;

        let sources: Vec<Innovation> = (0..=input_count).collect();
        let outputs: Vec<Innovation> = (1 + input_count..=input_count + output_count).collect();
        let hidden: Vec<Innovation> = (1 + input_count + output_count
            ..=input_count + output_count + hidden_count)
            .collect();

        let mut next_id = self.nodes.len();
        if hidden.is_empty() {
            self.connect_layers(&sources, &outputs, next_id, config, rng);
        } else {
            self.connect_layers(&sources, &hidden, next_id, config, rng);
            next_id += sources.len() * hidden.len();
            self.connect_layers(&hidden, &outputs, next_id, config, rng);
        }
    }

    /// Expresses a random subset of the genes between the
    /// `from` and `to` node groups. The gene between `from[s]`
    /// and `to[t]` gets innovation number `first_id + s ⨯ |to| + t`.
    fn connect_layers(
        &mut self,
        from: &[Innovation],
        to: &[Innovation],
        first_id: Innovation,
        config: &GeneticConfig,
        rng: &mut impl Rng,
    ) {
        let possible = from.len() * to.len();
        let count = initial_gene_count(possible, config.initial_interconnection_proportion, rng);
        let mut chosen = index::sample(rng, possible, count).into_vec();
        chosen.sort_unstable();
        for pair_index in chosen {
            let (input, output) = (from[pair_index / to.len()], to[pair_index % to.len()]);
            let weight = Gene::random_weight(config, rng);
            self.add_gene_unchecked(first_id + pair_index, input, output, weight);
        }
    }

    /// Add a new gene to the genome.
    /// Returns a reference to the new gene.
    ///
    /// # Errors
    ///
    /// This function returns an error if a gene with the same
    /// `gene_id` already existed in the genome, if either `input_id`
    /// or `output_id` do not correspond to nodes present in the genome,
    /// if another gene already joins the same endpoints, or if
    /// `output_id` corresponds to a bias or input node.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::{GeneticConfig, Genome};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// let mut genome = Genome::new(&config);
    ///
    /// // The genome is initially empty.
    /// assert_eq!(genome.genes().count(), 0);
    ///
    /// let inserted_gene = genome.add_gene(42, 2, 4, 2.5).unwrap().clone();
    ///
    /// assert_eq!(&inserted_gene, genome.genes().next().unwrap());
    /// assert_eq!(inserted_gene.innovation(), 42);
    /// assert_eq!(inserted_gene.input(), 2);
    /// assert_eq!(inserted_gene.output(), 4);
    /// assert_eq!(inserted_gene.weight(), 2.5);
    ///
    /// // Genes may not end at inputs...
    /// assert!(genome.add_gene(43, 4, 1, 1.0).is_err());
    /// // ...nor duplicate existing connections.
    /// assert!(genome.add_gene(44, 2, 4, 1.0).is_err());
    /// ```
    pub fn add_gene(
        &mut self,
        gene_id: Innovation,
        input_id: Innovation,
        output_id: Innovation,
        weight: f64,
    ) -> Result<&mut Gene, GenomeError> {
        self.check_gene_viability(gene_id, input_id, output_id)?;
        Ok(self.add_gene_unchecked(gene_id, input_id, output_id, weight))
    }

    /// Add a new gene to the genome.
    /// Returns a reference to the new gene.
    /// Assumes that the gene is not a duplicate
    /// or invalid gene for the genome.
    fn add_gene_unchecked(
        &mut self,
        gene_id: Innovation,
        input_id: Innovation,
        output_id: Innovation,
        weight: f64,
    ) -> &mut Gene {
        self.node_pairings.insert((input_id, output_id));
        self.genes
            .entry(gene_id)
            .or_insert_with(|| Gene::new(gene_id, input_id, output_id, weight))
    }

    /// Checks whether a gene is a duplicate or
    /// is invalid for the genome.
    fn check_gene_viability(
        &self,
        gene_id: Innovation,
        input_id: Innovation,
        output_id: Innovation,
    ) -> Result<(), GenomeError> {
        use GenomeError::*;
        if self.genes.contains_key(&gene_id) {
            Err(DuplicateGeneID(gene_id))
        } else if !(self.nodes.contains_key(&input_id) && self.nodes.contains_key(&output_id)) {
            Err(NonexistantEndpoints(input_id, output_id))
        } else if self.node_pairings.contains(&(input_id, output_id)) {
            Err(DuplicateGeneWithEndpoints(gene_id, input_id, output_id))
        } else if self.nodes[&output_id].node_type().is_source_only() {
            Err(SourceOnlyEndpoint(output_id))
        } else {
            Ok(())
        }
    }

    /// Add a new hidden node to the genome.
    /// Returns a reference to the newly created node.
    ///
    /// # Errors
    ///
    /// This function returns an error if a node of the
    /// same ID already existed in the genome.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::{ActivationType, GeneticConfig, Genome, NodeType};
    ///
    /// let mut genome = Genome::new(&GeneticConfig::zero());
    ///
    /// // Bias, one input and one output.
    /// assert_eq!(genome.nodes().count(), 3);
    ///
    /// let inserted_node = genome.add_node(42, ActivationType::Gaussian).unwrap().clone();
    ///
    /// assert_eq!(genome.nodes().count(), 4);
    /// assert_eq!(inserted_node.innovation(), 42);
    /// assert_eq!(inserted_node.node_type(), NodeType::Hidden);
    ///
    /// assert!(genome.add_node(42, ActivationType::Sigmoid).is_err());
    /// ```
    pub fn add_node(
        &mut self,
        node_id: Innovation,
        activation_type: ActivationType,
    ) -> Result<&mut Node, GenomeError> {
        if self.nodes.contains_key(&node_id) {
            return Err(GenomeError::DuplicateNodeID(node_id));
        }
        Ok(self
            .nodes
            .entry(node_id)
            .or_insert_with(|| Node::new(node_id, NodeType::Hidden, activation_type)))
    }

    /// Returns the gene with the given innovation number, if any.
    pub fn gene(&self, gene_id: Innovation) -> Option<&Gene> {
        self.genes.get(&gene_id)
    }

    /// Returns a mutable reference to the gene with the
    /// given innovation number, if any.
    pub fn gene_mut(&mut self, gene_id: Innovation) -> Option<&mut Gene> {
        self.genes.get_mut(&gene_id)
    }

    /// Sets the weight of the gene with the given innovation number.
    ///
    /// # Errors
    /// Returns an error if no such gene exists.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::{GeneticConfig, Genome};
    ///
    /// let mut genome = Genome::new(&GeneticConfig::zero());
    /// genome.add_gene(7, 1, 2, 1.0).unwrap();
    ///
    /// genome.set_gene_weight(7, -0.5).unwrap();
    /// assert_eq!(genome.gene(7).unwrap().weight(), -0.5);
    ///
    /// assert!(genome.set_gene_weight(8, 1.0).is_err());
    /// ```
    pub fn set_gene_weight(&mut self, gene_id: Innovation, weight: f64) -> Result<(), GenomeError> {
        self.genes
            .get_mut(&gene_id)
            .map(|gene| gene.set_weight(weight))
            .ok_or(GenomeError::AbsentGene(gene_id))
    }

    /// Returns an iterator over the set of the genome's genes.
    ///
    /// # Notes
    /// No ordering is guaranteed.
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.genes.values()
    }

    /// Returns an iterator over the set of the genome's nodes.
    ///
    /// # Notes
    /// No ordering is guaranteed.
    ///
    /// # Examples
    /// ```
    /// use backprop_neat_nn::genomics::{GeneticConfig, Genome};
    ///
    /// let genome = Genome::new(&GeneticConfig::zero());
    ///
    /// for node in genome.nodes() {
    ///     println!("node: {}", node);
    /// }
    /// ```
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of input nodes (excluding the bias).
    pub fn input_count(&self) -> usize {
        self.count_nodes_of_type(NodeType::Input)
    }

    /// Number of output nodes.
    pub fn output_count(&self) -> usize {
        self.count_nodes_of_type(NodeType::Output)
    }

    fn count_nodes_of_type(&self, node_type: NodeType) -> usize {
        self.nodes
            .values()
            .filter(|n| n.node_type() == node_type)
            .count()
    }
}

/// Number of genes to express out of `possible`, rounding
/// the expected count up or down at random.
fn initial_gene_count(possible: usize, proportion: f64, rng: &mut impl Rng) -> usize {
    if possible == 0 || proportion <= 0.0 {
        return 0;
    }
    let expected = possible as f64 * proportion.min(1.0);
    let mut count = expected.floor() as usize;
    if rng.gen::<f64>() < expected.fract() {
        count += 1;
    }
    count.clamp(1, possible)
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut genes: Vec<&Gene> = self.genes.values().collect();
        let mut nodes: Vec<&Node> = self.nodes.values().collect();
        genes.sort_unstable_by_key(|g| g.innovation());
        nodes.sort_unstable_by_key(|n| n.innovation());
        f.debug_struct("Genome")
            .field("Genes", &genes)
            .field("Nodes", &nodes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::num::NonZeroUsize;

    fn config(inputs: usize, outputs: usize, hidden: usize, proportion: f64) -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            hidden_count: hidden,
            initial_interconnection_proportion: proportion,
            weight_bound: 5.0,
            ..GeneticConfig::zero()
        }
    }

    #[test]
    fn new_fully_connected_direct() {
        for input_count in 1..6 {
            for output_count in 1..6 {
                let mut config = config(input_count, output_count, 0, 1.0);
                config.output_activation_types =
                    vec![ActivationType::Gaussian, ActivationType::Identity];

                let genome = Genome::new(&config);
                assert_eq!(genome.genes.len(), (input_count + 1) * output_count);
                assert_eq!(genome.nodes[&BIAS_ID].node_type(), NodeType::Bias);
                assert_eq!(genome.input_count(), input_count);
                assert_eq!(genome.output_count(), output_count);
                assert_eq!(
                    genome.nodes[&(input_count + 1)].activation_type(),
                    ActivationType::Gaussian
                );
                if output_count > 2 {
                    assert_eq!(
                        genome.nodes[&(input_count + 3)].activation_type(),
                        ActivationType::Sigmoid
                    );
                }
                let first_gene = 1 + input_count + output_count;
                for g in genome.genes.values() {
                    assert_eq!(
                        g.innovation(),
                        first_gene + g.input() * output_count + (g.output() - input_count - 1),
                        "gene: {:?}, total I/O, {}/{}",
                        g,
                        input_count,
                        output_count
                    );
                    assert!(g.weight().abs() <= 5.0);
                }
            }
        }
    }

    #[test]
    fn new_fully_connected_hidden() {
        let genome = Genome::new(&config(4, 4, 2, 1.0));
        let hidden: Vec<_> = genome
            .nodes()
            .filter(|n| n.node_type() == NodeType::Hidden)
            .map(|n| n.innovation())
            .collect();
        assert_eq!(hidden.len(), 2);
        assert!(hidden.iter().all(|h| (9..=10).contains(h)));
        assert_eq!(genome.genes.len(), 5 * 2 + 2 * 4);
        // No gene bypasses the hidden layer.
        assert!(genome
            .genes()
            .all(|g| hidden.contains(&g.input()) || hidden.contains(&g.output())));
        let ids: HashSet<_> = genome.genes().map(|g| g.innovation()).collect();
        assert_eq!(ids, (11..11 + 18).collect::<HashSet<_>>());
    }

    #[test]
    fn new_unconnected() {
        let genome = Genome::new(&config(3, 3, 1, 0.0));
        assert_eq!(genome.genes.len(), 0);
        assert_eq!(genome.nodes.len(), 8);
    }

    #[test]
    fn new_partial_at_least_one_per_group() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let genome = Genome::with_rng(&config(2, 2, 3, 0.01), &mut rng);
            let into_hidden = genome.genes().filter(|g| g.input() <= 2).count();
            let out_of_hidden = genome.genes().filter(|g| g.input() > 2).count();
            assert_eq!(into_hidden, 1);
            assert_eq!(out_of_hidden, 1);
        }
    }

    #[test]
    fn new_partial_proportion() {
        let mut rng = StdRng::seed_from_u64(11);
        let genome = Genome::with_rng(&config(9, 10, 0, 0.5), &mut rng);
        assert_eq!(genome.genes.len(), 50);
    }

    #[test]
    fn same_seed_same_genome() {
        let mut config = config(3, 2, 2, 0.6);
        config.activation_types = vec![ActivationType::Gaussian, ActivationType::ReLU];
        let first = Genome::with_rng(&config, &mut StdRng::seed_from_u64(5));
        let second = Genome::with_rng(&config, &mut StdRng::seed_from_u64(5));
        assert_eq!(first, second);
    }

    #[test]
    fn add_gene() {
        const INNOVATION: Innovation = 631;
        const INPUT: Innovation = 0;
        const OUTPUT: Innovation = 2;
        const WEIGHT: f64 = 3.0;

        let mut genome = Genome::new(&GeneticConfig::zero());
        let gene = genome.add_gene(INNOVATION, INPUT, OUTPUT, WEIGHT).unwrap();

        assert_eq!(gene.innovation(), INNOVATION);
        assert_eq!(gene.input(), INPUT);
        assert_eq!(gene.output(), OUTPUT);
        assert_eq!(gene.weight(), WEIGHT);

        let gene = gene.clone();

        assert_eq!(genome.genes.len(), 1);
        assert_eq!(&genome.genes[&INNOVATION], &gene);
    }

    #[test]
    fn add_gene_duplicate_gene_innovation() {
        let mut genome = Genome::new(&GeneticConfig::zero());
        genome.add_gene(0, 1, 2, 1.0).unwrap();
        genome.add_node(3, ActivationType::Sigmoid).unwrap();
        assert_eq!(
            genome.add_gene(0, 1, 3, 1.0).unwrap_err(),
            GenomeError::DuplicateGeneID(0)
        );
    }

    #[test]
    fn add_gene_duplicate_io() {
        let mut genome = Genome::new(&config(1, 1, 0, 1.0));
        assert_eq!(
            genome.add_gene(555, 1, 2, 3.0).unwrap_err(),
            GenomeError::DuplicateGeneWithEndpoints(555, 1, 2)
        );
    }

    #[test]
    fn add_gene_invalid_endpoints() {
        let mut genome = Genome::new(&GeneticConfig::zero());
        assert_eq!(
            genome.add_gene(631, 500, 2, 3.0).unwrap_err(),
            GenomeError::NonexistantEndpoints(500, 2)
        );
        assert_eq!(
            genome.add_gene(631, 1, 500, 3.0).unwrap_err(),
            GenomeError::NonexistantEndpoints(1, 500)
        );
    }

    #[test]
    fn add_gene_into_source_only_node() {
        let mut genome = Genome::new(&GeneticConfig::zero());
        assert_eq!(
            genome.add_gene(631, 2, 1, 3.0).unwrap_err(),
            GenomeError::SourceOnlyEndpoint(1)
        );
        assert_eq!(
            genome.add_gene(632, 1, BIAS_ID, 3.0).unwrap_err(),
            GenomeError::SourceOnlyEndpoint(BIAS_ID)
        );
    }

    #[test]
    fn add_node() {
        const INNOVATION: Innovation = 42;
        const ACTIVATION_TYPE: ActivationType = ActivationType::Gaussian;

        let mut genome = Genome::new(&GeneticConfig::zero());
        let node = genome.add_node(INNOVATION, ACTIVATION_TYPE).unwrap();

        assert_eq!(node.innovation(), INNOVATION);
        assert_eq!(node.node_type(), NodeType::Hidden);
        assert_eq!(node.activation_type(), ACTIVATION_TYPE);

        let node = node.clone();

        assert_eq!(genome.nodes.len(), 3 + 1);
        assert_eq!(&genome.nodes[&INNOVATION], &node);
    }

    #[test]
    fn add_node_duplicate() {
        let mut genome = Genome::new(&GeneticConfig::zero());
        assert_eq!(
            genome.add_node(BIAS_ID, ActivationType::Sigmoid).unwrap_err(),
            GenomeError::DuplicateNodeID(BIAS_ID)
        );
    }

    #[test]
    fn serde() {
        let genome = Genome::new(&config(2, 2, 1, 1.0));
        let json = serde_json::to_string(&genome).unwrap();
        let restored: Genome = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, genome);
    }
}
