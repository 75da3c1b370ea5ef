pub mod csv_table_writer;
