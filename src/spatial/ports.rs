//! Port directions, per-port maps and routing permutations
//!
//! Ports are numbered clockwise starting at the top edge. Port `k` always faces
//! port `(k + 2) mod 4` of the neighboring tile, and the renderer derives each
//! side's geometry by rotating the north side `k` quarter turns.

use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the four tile edges
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Port {
    /// Top edge (pixel row 0)
    North,
    /// Right edge
    East,
    /// Bottom edge
    South,
    /// Left edge
    West,
}

impl Port {
    /// All ports in index order
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Clockwise index, 0 for north through 3 for west
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Port with the given index modulo 4
    pub const fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }

    /// Port on the facing side of the neighboring tile
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Quarter turns clockwise from `self` to `other`
    pub const fn turns_to(self, other: Self) -> usize {
        (other.index() + 4 - self.index()) % 4
    }

    /// Grid step `(dx, dy)` towards the neighbor across this port
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// Fixed-size map with one value per port
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PortMap<T>(pub [T; 4]);

impl<T> PortMap<T> {
    /// Build a map by evaluating `f` for every port in index order
    pub fn from_fn(mut f: impl FnMut(Port) -> T) -> Self {
        Self([
            f(Port::North),
            f(Port::East),
            f(Port::South),
            f(Port::West),
        ])
    }

    /// Iterate `(port, value)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (Port, &T)> {
        Port::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Port> for PortMap<T> {
    type Output = T;

    fn index(&self, port: Port) -> &T {
        let [north, east, south, west] = &self.0;
        match port {
            Port::North => north,
            Port::East => east,
            Port::South => south,
            Port::West => west,
        }
    }
}

impl<T> IndexMut<Port> for PortMap<T> {
    fn index_mut(&mut self, port: Port) -> &mut T {
        let [north, east, south, west] = &mut self.0;
        match port {
            Port::North => north,
            Port::East => east,
            Port::South => south,
            Port::West => west,
        }
    }
}

/// Bijection from entry ports to exit ports, with its inverse kept in sync
///
/// `exit(k)` is the port a path entering at `k` leaves through and
/// `entry(d)` is the port whose path arrives at `d`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Routing {
    exits: PortMap<Port>,
    entries: PortMap<Port>,
}

impl Default for Routing {
    fn default() -> Self {
        Self::identity()
    }
}

impl Routing {
    /// Every path returns through the port it entered
    pub const fn identity() -> Self {
        Self {
            exits: PortMap(Port::ALL),
            entries: PortMap(Port::ALL),
        }
    }

    /// Build a routing from exit indices, `exits[k]` being the exit for port `k`
    ///
    /// Returns `None` unless `exits` is a permutation of `0..4`.
    pub fn from_exits(exits: [usize; 4]) -> Option<Self> {
        let mut seen = [false; 4];
        for &exit in &exits {
            let slot = seen.get_mut(exit)?;
            if *slot {
                return None;
            }
            *slot = true;
        }

        let exits = PortMap(exits.map(Port::from_index));
        let mut entries = PortMap(Port::ALL);
        for (entry, &exit) in exits.iter() {
            entries[exit] = entry;
        }
        Some(Self { exits, entries })
    }

    /// Exit port for a path entering at `port` (π)
    pub fn exit(&self, port: Port) -> Port {
        self.exits[port]
    }

    /// Entry port whose path exits at `port` (π⁻¹)
    pub fn entry(&self, port: Port) -> Port {
        self.entries[port]
    }

    /// Whether the path entering at `port` returns through the same port
    pub fn is_fixed(&self, port: Port) -> bool {
        self.exit(port) == port
    }

    /// Quarter turns clockwise from `port` to its exit
    pub fn relative_exit(&self, port: Port) -> usize {
        port.turns_to(self.exit(port))
    }

    /// Exchange the exits of two entry ports, keeping the inverse consistent
    pub fn swap_exits(&mut self, a: Port, b: Port) {
        let exit_a = self.exits[a];
        let exit_b = self.exits[b];
        self.exits[a] = exit_b;
        self.exits[b] = exit_a;
        self.entries[exit_b] = a;
        self.entries[exit_a] = b;
    }

    /// Exit indices in port order
    pub fn exit_indices(&self) -> [usize; 4] {
        self.exits.0.map(Port::index)
    }
}
