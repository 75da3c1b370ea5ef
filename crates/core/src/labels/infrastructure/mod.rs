pub mod iuv_reader;
pub mod label_image_file;
