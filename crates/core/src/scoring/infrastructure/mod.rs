pub mod kuhn_munkres_assigner;
