pub mod cuboid;
