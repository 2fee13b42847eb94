pub mod product_reader;
pub mod product_writer;
pub mod sales_writer;
