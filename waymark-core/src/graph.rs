//! Complete distance graph over the start location and every place.
//!
//! The [`GraphBuilder`] turns a list of places and a start location into an
//! immutable [`PlaceGraph`]. Edges are symmetric great-circle distances with
//! a walking-time estimate; the builder never filters places.

use std::collections::HashMap;

use geo::{Coord, Distance, Haversine, Point};
use thiserror::Error;

use crate::Place;

/// Walking speed assumed when none is configured.
pub const DEFAULT_WALKING_SPEED_KMH: f64 = 5.0;

const METRES_PER_KM: f64 = 1000.0;

/// Distance and travel time between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Great-circle distance in kilometres.
    pub distance_km: f64,
    /// Walking time in minutes.
    pub travel_minutes: f64,
}

impl Edge {
    /// The edge between a node and itself.
    pub const ZERO: Self = Self {
        distance_km: 0.0,
        travel_minutes: 0.0,
    };
}

/// A node in the graph: the start location or a place by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    /// The visitor's start location.
    Start,
    /// The place at this index of [`PlaceGraph::places`].
    Place(usize),
}

impl Node {
    const fn slot(self) -> usize {
        match self {
            Self::Start => 0,
            Self::Place(index) => index + 1,
        }
    }
}

/// Errors returned by [`GraphBuilder::build`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The walking speed was zero, negative or not finite.
    #[error("walking speed must be a positive number of km/h, got {speed}")]
    InvalidWalkingSpeed {
        /// The rejected speed.
        speed: f64,
    },
    /// Two places shared an identifier.
    #[error("place id {id:?} appears more than once")]
    DuplicatePlaceId {
        /// The repeated identifier.
        id: String,
    },
}

/// Immutable snapshot of places with a complete edge table.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceGraph {
    start: Coord<f64>,
    places: Vec<Place>,
    index: HashMap<String, usize>,
    edges: Vec<Vec<Edge>>,
    walking_speed_kmh: f64,
}

impl PlaceGraph {
    /// The start location.
    pub const fn start(&self) -> Coord<f64> {
        self.start
    }

    /// All places, in input order.
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// The place at `index`.
    pub fn place(&self, index: usize) -> Option<&Place> {
        self.places.get(index)
    }

    /// Index of the place with `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Number of places.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Whether the graph holds no places.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Walking speed used to derive travel times.
    pub const fn walking_speed_kmh(&self) -> f64 {
        self.walking_speed_kmh
    }

    /// The edge between two nodes, or `None` if either is unknown.
    pub fn edge(&self, from: Node, to: Node) -> Option<Edge> {
        self.edges
            .get(from.slot())
            .and_then(|row| row.get(to.slot()))
            .copied()
    }

    /// The edge from the start to the place at `index`.
    pub fn edge_from_start(&self, index: usize) -> Option<Edge> {
        self.edge(Node::Start, Node::Place(index))
    }
}

/// Builds a [`PlaceGraph`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{GraphBuilder, Place};
///
/// let places = vec![Place::new("a", "park", Coord { x: 0.0, y: 0.0 })];
/// let graph = GraphBuilder::new().build(places, Coord { x: 0.0, y: 0.0 })?;
/// let edge = graph.edge_from_start(0).expect("edge");
/// assert_eq!(edge.travel_minutes, 0.0);
/// # Ok::<(), waymark_core::GraphError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphBuilder {
    walking_speed_kmh: f64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            walking_speed_kmh: DEFAULT_WALKING_SPEED_KMH,
        }
    }
}

impl GraphBuilder {
    /// Construct a builder with the default walking speed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the walking speed.
    pub const fn with_walking_speed(mut self, kmh: f64) -> Self {
        self.walking_speed_kmh = kmh;
        self
    }

    /// Build the graph. Every supplied place becomes a node.
    pub fn build(&self, places: Vec<Place>, start: Coord<f64>) -> Result<PlaceGraph, GraphError> {
        let speed = self.walking_speed_kmh;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(GraphError::InvalidWalkingSpeed { speed });
        }

        let mut index = HashMap::with_capacity(places.len());
        for (position, place) in places.iter().enumerate() {
            if index.insert(place.id.clone(), position).is_some() {
                return Err(GraphError::DuplicatePlaceId {
                    id: place.id.clone(),
                });
            }
        }

        let locations: Vec<Coord<f64>> = std::iter::once(start)
            .chain(places.iter().map(|p| p.location))
            .collect();
        let size = locations.len();
        let mut edges = vec![vec![Edge::ZERO; size]; size];
        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate().skip(i + 1) {
                let distance_km = haversine_km(*from, *to);
                let edge = Edge {
                    distance_km,
                    travel_minutes: travel_minutes(distance_km, speed),
                };
                edges[i][j] = edge;
                edges[j][i] = edge;
            }
        }

        log::debug!(
            "built graph with {} places and {} edges",
            places.len(),
            size * size.saturating_sub(1)
        );
        Ok(PlaceGraph {
            start,
            places,
            index,
            edges,
            walking_speed_kmh: speed,
        })
    }
}

/// Great-circle distance in kilometres between two WGS84 coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::graph::haversine_km;
///
/// let london = Coord { x: -0.1278, y: 51.5074 };
/// let paris = Coord { x: 2.3522, y: 48.8566 };
/// let km = haversine_km(london, paris);
/// assert!((km - 343.5).abs() < 1.0);
/// ```
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to)) / METRES_PER_KM
}

/// Walking minutes for `distance_km`; zero distances take zero time.
pub fn travel_minutes(distance_km: f64, speed_kmh: f64) -> f64 {
    if distance_km <= 0.0 {
        return 0.0;
    }
    distance_km / speed_kmh * 60.0
}
