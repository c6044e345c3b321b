use crate::{MeshError, TetMesh};

use std::path::Path;

use vtkio::{
  model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, ElementType,
    UnstructuredGridPiece, Version, VertexNumbers, Vtk,
  },
  IOBuffer,
};

/// Nodal scalar field to be attached to the exported mesh.
pub struct PointScalars<'a> {
  pub name: &'a str,
  pub values: &'a [f64],
}

pub fn tet_mesh_to_vtk(mesh: &TetMesh, point_data: &[PointScalars]) -> Vtk {
  let points = IOBuffer::new(mesh.coords().matrix().iter().copied().collect::<Vec<f64>>());

  let vertices = mesh
    .cells()
    .iter()
    .flat_map(|cell| std::iter::once(4).chain(cell.vertices.map(|v| v as u32)))
    .collect();
  let cell_verts = VertexNumbers::Legacy {
    num_cells: mesh.ncells() as u32,
    vertices,
  };
  let types = vec![CellType::Tetra; mesh.ncells()];
  let cells = Cells { cell_verts, types };

  let point = point_data
    .iter()
    .map(|scalars| {
      assert_eq!(scalars.values.len(), mesh.nvertices());
      Attribute::DataArray(DataArray {
        name: scalars.name.to_string(),
        elem: ElementType::Scalars {
          num_comp: 1,
          lookup_table: None,
        },
        data: IOBuffer::F64(scalars.values.to_vec()),
      })
    })
    .collect();

  let grid = UnstructuredGridPiece {
    points,
    cells,
    data: Attributes {
      point,
      cell: Vec::new(),
    },
  };
  let data = grid.into();

  Vtk {
    version: Version::new((4, 2)),
    title: String::from("tractfem pressure field"),
    byte_order: ByteOrder::native(),
    data,
    file_path: None,
  }
}

/// Writes a legacy ASCII `.vtk` file.
pub fn save_vtk(
  mesh: &TetMesh,
  point_data: &[PointScalars],
  path: impl AsRef<Path>,
) -> Result<(), MeshError> {
  let vtk = tet_mesh_to_vtk(mesh, point_data);
  vtk
    .export_ascii(path)
    .map_err(|err| MeshError::Vtk(format!("{err:?}")))
}
