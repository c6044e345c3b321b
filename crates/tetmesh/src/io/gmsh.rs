//! Gmsh `.msh` (version 4.1) import.
//!
//! Tetrahedra become cells, triangles become boundary facets. The tag of an
//! element is the physical group of the entity it belongs to, which is how
//! subdomain and boundary markers are carried by gmsh.

use crate::{coords::MeshCoords, Cell, Facet, MeshError, Tag, TetMesh, VertexIdx};

use std::{collections::HashMap, path::Path};

pub fn load_gmsh_file(path: impl AsRef<Path>) -> Result<TetMesh, MeshError> {
  let bytes = std::fs::read(path)?;
  gmsh2tet_mesh(&bytes)
}

/// Load Gmesh `.msh` file (version 4.1).
///
/// Nodes not referenced by any tetrahedron are dropped and the remaining
/// vertices renumbered in file order. Tagged triangles inside the volume
/// are ignored, only exterior faces become facets.
pub fn gmsh2tet_mesh(bytes: &[u8]) -> Result<TetMesh, MeshError> {
  let msh = mshio::parse_msh_bytes(bytes).map_err(|err| MeshError::MshParse(format!("{err:?}")))?;

  let physical_tags = entity_physical_tags(&msh);
  let physical_tag = |dim: i32, entity: i32| -> Tag {
    match physical_tags.get(&(dim, entity)) {
      Some(&tag) => tag,
      None => {
        tracing::warn!("entity ({dim}, {entity}) has no physical group, using entity tag");
        entity
      }
    }
  };

  let nodes = msh.data.nodes.ok_or(MeshError::MissingSection("Nodes"))?;
  let node_coords: Vec<_> = nodes
    .node_blocks
    .iter()
    .flat_map(|block| block.nodes.iter())
    .map(|node| na::Vector3::new(node.x, node.y, node.z))
    .collect();
  let node_indices = node_tag_indices(&nodes);
  let node_index = |tag: u64| -> Result<usize, MeshError> {
    node_indices
      .get(&tag)
      .copied()
      .ok_or(MeshError::UnknownNode(tag))
  };

  let mut tets = Vec::new();
  let mut trias = Vec::new();

  let elements = msh.data.elements.ok_or(MeshError::MissingSection("Elements"))?;
  for block in elements.element_blocks {
    type ElType = mshio::ElementType;
    match block.element_type {
      ElType::Tet4 => {
        let tag = physical_tag(3, block.entity_tag);
        for e in &block.elements {
          let vertices = nodes_array::<4>(&e.nodes, &node_index)?;
          tets.push(Cell::new(vertices, tag));
        }
      }
      ElType::Tri3 => {
        let tag = physical_tag(2, block.entity_tag);
        for e in &block.elements {
          let vertices = nodes_array::<3>(&e.nodes, &node_index)?;
          trias.push(Facet::new(vertices, tag));
        }
      }
      ElType::Pnt | ElType::Lin2 => continue,
      _ => {
        tracing::warn!("unsupported gmsh ElementType: {:?}", block.element_type);
        continue;
      }
    }
  }

  if tets.is_empty() {
    return Err(MeshError::NoCells);
  }

  let trias = exterior_triangles(&tets, trias);

  // Compact numbering of the vertices used by the volume mesh.
  let mut renumber: Vec<Option<VertexIdx>> = vec![None; node_coords.len()];
  let mut used = vec![false; node_coords.len()];
  tets.iter().flat_map(|t| t.vertices).for_each(|v| used[v] = true);
  let mut points = Vec::new();
  for (inode, _) in used.iter().enumerate().filter(|(_, &u)| u) {
    renumber[inode] = Some(points.len());
    points.push(node_coords[inode]);
  }

  let ncells = tets.len();
  let cells = tets
    .into_iter()
    .map(|c| Cell::new(c.vertices.map(|v| renumber[v].unwrap_or_default()), c.tag))
    .collect();

  // Exterior triangles are tetrahedron faces, so all their vertices are kept.
  let facets: Vec<_> = trias
    .into_iter()
    .map(|f| Facet::new(f.vertices.map(|v| renumber[v].unwrap_or_default()), f.tag))
    .collect();

  tracing::debug!(
    "loaded gmsh mesh: {} vertices, {} cells, {} facets",
    points.len(),
    ncells,
    facets.len()
  );

  TetMesh::new(MeshCoords::from_points(&points), cells, facets)
}

/// Position of every node in block order, keyed by node tag.
///
/// mshio keeps the per-block tag map only for sparse sections. Dense
/// sections number their nodes consecutively from `min_node_tag`.
fn node_tag_indices(nodes: &mshio::Nodes<u64, i32, f64>) -> HashMap<u64, usize> {
  let mut indices = HashMap::with_capacity(nodes.num_nodes as usize);
  let mut offset = 0;
  for block in &nodes.node_blocks {
    match &block.node_tags {
      Some(tags) => indices.extend(tags.iter().map(|(&tag, &ilocal)| (tag, offset + ilocal))),
      None => indices.extend(
        (offset..offset + block.nodes.len()).map(|inode| (nodes.min_node_tag + inode as u64, inode)),
      ),
    }
    offset += block.nodes.len();
  }
  indices
}

/// Keeps the triangles that are a face of exactly one tetrahedron.
///
/// Tagged interfaces inside the volume are not part of the boundary.
fn exterior_triangles(tets: &[Cell], trias: Vec<Facet>) -> Vec<Facet> {
  let mut face_count: HashMap<[VertexIdx; 3], usize> = HashMap::new();
  for tet in tets {
    for iopposite in 0..4 {
      *face_count.entry(sorted_face(&tet.vertices, iopposite)).or_default() += 1;
    }
  }

  let ntrias = trias.len();
  let exterior: Vec<_> = trias
    .into_iter()
    .filter(|f| {
      let mut key = f.vertices;
      key.sort_unstable();
      face_count.get(&key) == Some(&1)
    })
    .collect();
  if exterior.len() < ntrias {
    tracing::warn!(
      "ignored {} tagged triangles that are not on the boundary of the volume mesh",
      ntrias - exterior.len()
    );
  }
  exterior
}

/// Local vertices of the face opposite to each vertex of a tetrahedron.
const TET_FACES: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

fn sorted_face(vertices: &[VertexIdx; 4], iopposite: usize) -> [VertexIdx; 3] {
  let mut face = TET_FACES[iopposite].map(|l| vertices[l]);
  face.sort_unstable();
  face
}

fn entity_physical_tags(msh: &mshio::MshFile<u64, i32, f64>) -> HashMap<(i32, i32), Tag> {
  let mut map = HashMap::new();
  let Some(entities) = &msh.data.entities else {
    return map;
  };
  for s in &entities.surfaces {
    if let Some(&tag) = s.physical_tags.first() {
      map.insert((2, s.tag), tag);
    }
  }
  for v in &entities.volumes {
    if let Some(&tag) = v.physical_tags.first() {
      map.insert((3, v.tag), tag);
    }
  }
  map
}

fn nodes_array<const N: usize>(
  nodes: &[u64],
  node_index: &impl Fn(u64) -> Result<usize, MeshError>,
) -> Result<[VertexIdx; N], MeshError> {
  let mut vertices = [0; N];
  for (vertex, &tag) in vertices.iter_mut().zip(nodes) {
    *vertex = node_index(tag)?;
  }
  Ok(vertices)
}
